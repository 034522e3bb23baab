//! Loading of the experiment description from a block-tagged config file

use crate::{
    blocks::{get_data_block, BlockValue},
    dims::Dimensions,
    paths::resolve_file,
    ThorError, ThorResult,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// BAM files, reference files and controls of one experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperimentDescription {
    /// Replicate BAM files, one list per condition
    pub bamfiles: [Vec<PathBuf>; 2],
    pub genome: Option<PathBuf>,
    pub chrom_sizes: Option<PathBuf>,
    /// Input-DNA BAM files per condition, `None` when neither condition has any
    pub inputs: Option<[Vec<PathBuf>; 2]>,
}

impl ExperimentDescription {
    pub fn dims(&self) -> Dimensions {
        Dimensions::new(self.bamfiles[0].len())
    }

    pub fn has_inputs(&self) -> bool {
        self.inputs.is_some()
    }

    pub fn has_genome(&self) -> bool {
        self.genome.is_some()
    }

    /// False when the conditions have different numbers of input-DNA files
    pub fn inputs_balanced(&self) -> bool {
        match &self.inputs {
            Some([inputs_1, inputs_2]) => inputs_1.len() == inputs_2.len(),
            None => true,
        }
    }

    /// Every file the description refers to
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.bamfiles
            .iter()
            .flatten()
            .chain(self.genome.iter())
            .chain(self.chrom_sizes.iter())
            .chain(self.inputs.iter().flatten().flatten())
    }
}

fn resolve_list(value: BlockValue, kind: &'static str) -> ThorResult<Vec<PathBuf>> {
    value
        .into_lines()
        .iter()
        .map(|line| resolve_file(line, kind))
        .collect()
}

fn resolve_optional(
    value: BlockValue,
    tag: &str,
    kind: &'static str,
) -> ThorResult<Option<PathBuf>> {
    if value.is_empty() {
        return Ok(None);
    }
    match value {
        BlockValue::Scalar(line) => Ok(Some(resolve_file(line, kind)?)),
        BlockValue::List(lines) => Err(ThorError::InvalidConfig(format!(
            "block #{} must hold a single path, found {}",
            tag,
            lines.len()
        ))),
    }
}

/// Read `#rep1`, `#rep2`, `#genome`, `#chrom_sizes`, `#inputs1` and
/// `#inputs2` from `path` and check that every referenced file exists
pub fn load_experiment<P: AsRef<Path>>(path: P) -> ThorResult<ExperimentDescription> {
    let path = path.as_ref();

    let bamfiles_1 = resolve_list(get_data_block(path, "rep1")?, "BAM")?;
    let bamfiles_2 = resolve_list(get_data_block(path, "rep2")?, "BAM")?;

    if bamfiles_1.is_empty() || bamfiles_2.is_empty() {
        return Err(ThorError::InvalidConfig(format!(
            "config file {} must list BAM files under both #rep1 and #rep2",
            path.display()
        )));
    }
    if bamfiles_1.len() != bamfiles_2.len() {
        return Err(ThorError::ReplicateMismatch {
            rep1: bamfiles_1.len(),
            rep2: bamfiles_2.len(),
        });
    }

    let genome = resolve_optional(get_data_block(path, "genome")?, "genome", "Genome")?;
    let chrom_sizes = resolve_optional(
        get_data_block(path, "chrom_sizes")?,
        "chrom_sizes",
        "chrom size",
    )?;

    let inputs_1 = resolve_list(get_data_block(path, "inputs1")?, "BAM")?;
    let inputs_2 = resolve_list(get_data_block(path, "inputs2")?, "BAM")?;

    let inputs = if inputs_1.is_empty() && inputs_2.is_empty() {
        None
    } else {
        Some([inputs_1, inputs_2])
    };

    let experiment = ExperimentDescription {
        bamfiles: [bamfiles_1, bamfiles_2],
        genome,
        chrom_sizes,
        inputs,
    };

    if let Some([inputs_1, inputs_2]) = &experiment.inputs {
        if !experiment.inputs_balanced() {
            log::warn!(
                "Conditions have different numbers of input-DNA files ({} vs {})",
                inputs_1.len(),
                inputs_2.len()
            );
        }
    }

    log::debug!(
        "Loaded {} BAM files per condition from {}",
        experiment.dims().replicates,
        path.display()
    );

    Ok(experiment)
}
