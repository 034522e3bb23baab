//! End-to-end assembly of a run configuration

use crate::{
    cli::Args,
    dims::Dimensions,
    experiment::{load_experiment, ExperimentDescription},
    options::{assemble_options, RunOptions},
    output::{prepare_output, Confirm, OutputLayout},
    paths::normalize_path,
    ThorError, ThorResult,
};
use serde::Serialize;
use std::path::PathBuf;

/// Everything the peak calling pipeline needs, fixed for the whole run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunConfig {
    pub config_file: PathBuf,
    pub experiment: ExperimentDescription,
    pub dims: Dimensions,
    pub options: RunOptions,
    pub layout: OutputLayout,
}

impl RunConfig {
    /// Prefix of every file the run creates: output directory joined with the name
    pub fn output_prefix(&self) -> PathBuf {
        self.layout.output_dir.join(&self.options.name)
    }
}

/// Validate `args` against the experiment config file and prepare the
/// output directory.
///
/// All checks run before the output directory is modified, so a failing
/// option never costs existing results.
pub fn configure(args: &Args, confirm: &mut dyn Confirm) -> ThorResult<RunConfig> {
    let config_file = normalize_path(&args.config)?;
    if !config_file.is_file() {
        return Err(ThorError::Usage(format!(
            "Config file {} does not exist!",
            config_file.display()
        )));
    }
    log::info!("Reading experiment from {}", config_file.display());

    let experiment = load_experiment(&config_file)?;
    let dims = experiment.dims();
    log::info!(
        "{} conditions with {} replicates each",
        dims.conditions,
        dims.replicates
    );

    let options = assemble_options(args, &experiment)?;

    let output_dir = args.output_dir.as_ref().map(normalize_path).transpose()?;
    let protected: Vec<PathBuf> = std::iter::once(&config_file)
        .chain(experiment.files())
        .chain(options.input_files())
        .cloned()
        .collect();
    let layout = prepare_output(
        output_dir.as_deref(),
        &options.name,
        options.report,
        &protected,
        confirm,
    )?;

    if !experiment.has_inputs() {
        log::warn!("Do not compute GC-content, as there is no input file");
    }
    if !experiment.has_genome() {
        log::warn!("Do not compute GC-content, as there is no genome file");
    }

    let config = RunConfig {
        config_file,
        experiment,
        dims,
        options,
        layout,
    };
    log::info!("Output prefix: {}", config.output_prefix().display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::AssumeAnswer;
    use clap::Parser;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        dir: TempDir,
        config: PathBuf,
    }

    impl Fixture {
        /// rep1 = [a.bam, b.bam], rep2 = [c.bam, d.bam]; no genome, no inputs
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let mut body = String::new();
            for (tag, names) in [("rep1", ["a.bam", "b.bam"]), ("rep2", ["c.bam", "d.bam"])] {
                body.push_str(&format!("#{}\n", tag));
                for name in names {
                    let path = dir.path().join(name);
                    fs::write(&path, b"").unwrap();
                    body.push_str(&format!("{}\n", path.display()));
                }
            }
            let config = dir.path().join("exp.config");
            fs::write(&config, body).unwrap();
            Fixture { dir, config }
        }

        fn out(&self) -> PathBuf {
            self.dir.path().join("out")
        }

        fn args(&self, extra: &[&str]) -> Args {
            let out = self.out();
            let mut argv = vec![
                "thor".to_string(),
                self.config.display().to_string(),
                "--output-dir".to_string(),
                out.display().to_string(),
                "-n".to_string(),
                "exp".to_string(),
            ];
            argv.extend(extra.iter().map(|s| s.to_string()));
            Args::try_parse_from(argv).unwrap()
        }
    }

    fn with_old_results(dir: &Path) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("exp-diffpeaks.bed"), b"chr1\t100\t200\n").unwrap();
    }

    #[test]
    fn test_two_by_two_without_genome_or_inputs() {
        let fx = Fixture::new();
        let config = configure(&fx.args(&["--exts", "10,20,30,40"]), &mut AssumeAnswer(false)).unwrap();

        assert_eq!(config.dims, Dimensions { conditions: 2, replicates: 2 });
        assert_eq!(config.options.exts, Some(vec![vec![10, 20], vec![30, 40]]));
        assert!(config.options.no_gc_content);
        assert_eq!(config.experiment.inputs, None);
        assert_eq!(config.experiment.genome, None);
        assert_eq!(config.layout.output_dir, fx.out());
        assert_eq!(config.output_prefix(), fx.out().join("exp"));
        assert!(fx.out().is_dir());
    }

    #[test]
    fn test_existing_results_abort_when_not_confirmed() {
        let fx = Fixture::new();
        with_old_results(&fx.out());

        let result = configure(&fx.args(&[]), &mut AssumeAnswer(false));
        assert!(matches!(result, Err(ThorError::DirectoryConflict(_))));
        assert!(fx.out().join("exp-diffpeaks.bed").is_file());
    }

    #[test]
    fn test_existing_results_replaced_when_confirmed() {
        let fx = Fixture::new();
        with_old_results(&fx.out());

        configure(&fx.args(&[]), &mut AssumeAnswer(true)).unwrap();
        assert!(fx.out().is_dir());
        assert!(!fx.out().join("exp-diffpeaks.bed").exists());
    }

    #[test]
    fn test_dimension_mismatch_before_directory_is_touched() {
        let fx = Fixture::new();
        with_old_results(&fx.out());

        let result = configure(&fx.args(&["--exts", "1,2,3"]), &mut AssumeAnswer(true));
        match result {
            Err(ThorError::DimensionMismatch { option, expected, found }) => {
                assert_eq!(option, "--exts");
                assert_eq!(expected, 4);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(fx.out().join("exp-diffpeaks.bed").is_file());
    }

    #[test]
    fn test_missing_region_file_before_directory_is_touched() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.out()).unwrap();
        fs::write(fx.out().join("stale.wig"), b"").unwrap();

        let result = configure(&fx.args(&["--regions", "/nonexistent/r.bed"]), &mut AssumeAnswer(true));
        assert!(matches!(result, Err(ThorError::MissingFile { .. })));
        assert!(fx.out().join("stale.wig").is_file());
    }

    #[test]
    fn test_output_dir_holding_inputs_is_kept() {
        let fx = Fixture::new();
        let data = fx.dir.path();
        let args = Args::try_parse_from([
            "thor".to_string(),
            fx.config.display().to_string(),
            "--output-dir".to_string(),
            data.display().to_string(),
            "-n".to_string(),
            "exp".to_string(),
        ])
        .unwrap();

        let result = configure(&args, &mut AssumeAnswer(false));
        assert!(matches!(result, Err(ThorError::DirectoryConflict(_))));
        assert!(fx.config.is_file());
        for name in ["a.bam", "b.bam", "c.bam", "d.bam"] {
            assert!(data.join(name).is_file());
        }

        // with previous results present, confirming does not help either
        with_old_results(data);
        let result = configure(&args, &mut AssumeAnswer(true));
        assert!(matches!(result, Err(ThorError::DirectoryConflict(_))));
        assert!(data.join("exp-diffpeaks.bed").is_file());
        assert!(data.join("a.bam").is_file());
    }

    #[test]
    fn test_output_dir_holding_region_file_is_kept() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.out()).unwrap();
        let regions = fx.out().join("regions.bed");
        fs::write(&regions, b"chr1\t0\t1000\n").unwrap();

        let result = configure(
            &fx.args(&["--regions", &regions.display().to_string()]),
            &mut AssumeAnswer(true),
        );
        assert!(matches!(result, Err(ThorError::DirectoryConflict(_))));
        assert!(regions.is_file());
    }

    #[test]
    fn test_missing_config_is_usage_error() {
        let fx = Fixture::new();
        let args = Args::try_parse_from([
            "thor".to_string(),
            fx.dir.path().join("nope.config").display().to_string(),
        ])
        .unwrap();

        let err = configure(&args, &mut AssumeAnswer(false)).unwrap_err();
        assert!(matches!(err, ThorError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_report_layout() {
        let fx = Fixture::new();
        let config = configure(&fx.args(&["--report"]), &mut AssumeAnswer(false)).unwrap();

        let report = config.layout.report.unwrap();
        assert_eq!(report.dir, fx.out().join("report_exp"));
        assert!(report.pics.is_dir());
        assert!(report.data.is_dir());
    }

    #[test]
    fn test_serializes_to_json() {
        let fx = Fixture::new();
        let config = configure(&fx.args(&["--exts", "10,20,30,40"]), &mut AssumeAnswer(false)).unwrap();

        let json: serde_json::Value = serde_json::to_value(&config).unwrap();
        assert_eq!(json["dims"]["replicates"], 2);
        assert_eq!(json["options"]["exts"][1][0], 30);
        assert_eq!(json["options"]["no_gc_content"], true);
        assert!(json["experiment"]["inputs"].is_null());
    }
}
