//! Merging of command line options with the experiment description

use crate::{
    cli::Args,
    dims::{shape_option, Grid},
    experiment::ExperimentDescription,
    naming::experiment_name,
    paths::{find_executable, resolve_file},
    ThorError, ThorResult,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Tools converting signal tracks to bigWig
pub const SIGNAL_TOOLS: &[&str] = &["wigToBigWig", "bedGraphToBigWig", "bigWigMerge"];

/// Validated parameters of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOptions {
    pub name: String,
    pub merge: bool,
    pub merge_bin: bool,
    pub housekeeping_genes: Option<PathBuf>,
    pub report: bool,
    pub deadzones: Option<PathBuf>,
    pub no_correction: bool,
    pub pcutoff: f64,
    pub exts: Option<Grid<u32>>,
    pub exts_inputs: Option<Grid<u32>>,
    pub factors_inputs: Option<Grid<f64>>,
    pub scaling_factors_ip: Option<Grid<f64>>,
    pub save_input: bool,
    pub regions: Option<PathBuf>,
    pub binsize: u32,
    pub stepsize: u32,
    pub debug: bool,
    pub no_gc_content: bool,
    pub norm_regions: Option<PathBuf>,
    pub foldchange: f64,
    pub threshold: f64,
    pub size_ts: u32,
    pub par: u32,
    pub poisson: bool,
    pub single_strand: bool,
    pub m_threshold: u32,
    pub a_threshold: u32,
    pub rmdup: bool,
    pub call_peaks: bool,
    pub save_wig: bool,
    pub hmm_free_para: bool,
    /// False if a bigWig conversion tool is missing; signal is then not stored
    pub signal_tools_available: bool,
}

impl RunOptions {
    /// BED files given on the command line
    pub fn input_files(&self) -> impl Iterator<Item = &PathBuf> {
        [
            &self.housekeeping_genes,
            &self.deadzones,
            &self.regions,
            &self.norm_regions,
        ]
        .into_iter()
        .flatten()
    }
}

/// Reject parameter values the pipeline cannot work with
pub fn validate_parameters(args: &Args) -> ThorResult<()> {
    if !(0.0..=1.0).contains(&args.pcutoff) {
        return Err(ThorError::InvalidConfig(
            "p-value cutoff must be between 0 and 1".to_string(),
        ));
    }
    if args.binsize == 0 {
        return Err(ThorError::InvalidConfig("bin size must be positive".to_string()));
    }
    if args.stepsize == 0 {
        return Err(ThorError::InvalidConfig("step size must be positive".to_string()));
    }
    if args.size_ts == 0 {
        return Err(ThorError::InvalidConfig(
            "training set size must be positive".to_string(),
        ));
    }
    Ok(())
}

fn resolve_optional_file(path: Option<&Path>, kind: &'static str) -> ThorResult<Option<PathBuf>> {
    path.map(|p| resolve_file(p, kind)).transpose()
}

fn check_name(name: String) -> ThorResult<String> {
    if name.contains('/') || name.contains('\\') {
        return Err(ThorError::InvalidConfig(format!(
            "experiment name '{}' must not contain path separators",
            name
        )));
    }
    if name == "." || name == ".." {
        return Err(ThorError::InvalidConfig(format!(
            "experiment name '{}' does not name a file",
            name
        )));
    }
    Ok(name)
}

/// True if all bigWig conversion tools are on `PATH`
pub fn signal_tools_available() -> bool {
    let missing: Vec<&str> = SIGNAL_TOOLS
        .iter()
        .copied()
        .filter(|tool| find_executable(tool).is_none())
        .collect();

    if missing.is_empty() {
        return true;
    }
    log::warn!(
        "{} not found! Signal will not be stored!",
        missing.join(", ")
    );
    false
}

/// Combine parsed CLI flags with the loaded experiment.
///
/// GC-content normalization is switched off without a genome, input-DNA
/// factors are dropped without input files, and every per-BAM-file list is
/// checked against the experiment's dimensions and reshaped.
pub fn assemble_options(args: &Args, experiment: &ExperimentDescription) -> ThorResult<RunOptions> {
    validate_parameters(args)?;
    let dims = experiment.dims();

    let no_gc_content = args.no_gc_content || !experiment.has_genome();

    let factors_inputs = match args.factors_inputs.as_deref() {
        Some(factors) if !factors.is_empty() && !experiment.has_inputs() => {
            log::warn!("As no input-DNA, do not use input-DNA factors");
            None
        }
        other => other,
    };

    let exts = shape_option("--exts", args.exts.as_deref(), dims)?;
    let exts_inputs = shape_option("--exts-inputs", args.exts_inputs.as_deref(), dims)?;
    let scaling_factors_ip = shape_option("--scaling-factors", args.scaling_factors.as_deref(), dims)?;
    let factors_inputs = shape_option("--factors-inputs", factors_inputs, dims)?;

    let regions = resolve_optional_file(args.regions.as_deref(), "Region")?;
    let deadzones = resolve_optional_file(args.deadzones.as_deref(), "Deadzones")?;
    let housekeeping_genes =
        resolve_optional_file(args.housekeeping_genes.as_deref(), "Housekeeping genes")?;
    let norm_regions = resolve_optional_file(args.norm_regions.as_deref(), "Normalization region")?;

    let name = check_name(experiment_name(args.name.as_deref()))?;

    Ok(RunOptions {
        name,
        merge: args.merge,
        merge_bin: !args.no_merge_bin,
        housekeeping_genes,
        report: args.report,
        deadzones,
        no_correction: args.no_correction,
        pcutoff: args.pcutoff,
        exts,
        exts_inputs,
        factors_inputs,
        scaling_factors_ip,
        save_input: args.save_input,
        regions,
        binsize: args.binsize,
        stepsize: args.stepsize,
        debug: args.debug,
        no_gc_content,
        norm_regions,
        foldchange: args.foldchange,
        threshold: args.threshold,
        size_ts: args.size_ts,
        par: args.par,
        poisson: args.poisson,
        single_strand: args.single_strand,
        m_threshold: args.m_threshold,
        a_threshold: args.a_threshold,
        rmdup: args.rmdup,
        call_peaks: true,
        save_wig: true,
        hmm_free_para: false,
        signal_tools_available: signal_tools_available(),
    })
}
