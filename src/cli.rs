//! Command line surface of `thor`

use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "thor", version)]
#[command(about = "THOR detects differential peaks in multiple ChIP-seq profiles of two conditions")]
#[command(long_about = "
THOR detects differential peaks in multiple ChIP-seq profiles associated
with two distinct biological conditions.

The experiment is described by a config file made of tagged blocks:

  #rep1          BAM files of the first condition, one per line
  #rep2          BAM files of the second condition
  #genome        optional genome FASTA, enables GC-content normalization
  #chrom_sizes   optional chromosome sizes file
  #inputs1       optional input-DNA BAM files of the first condition
  #inputs2       optional input-DNA BAM files of the second condition

Options taking one value per BAM file expect a comma separated list ordered
as the BAM files of #rep1 followed by those of #rep2.
")]
pub struct Args {
    /// Experiment config file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Experiment's name and prefix for all files that are created
    #[arg(short, long)]
    pub name: Option<String>,

    /// Merge peaks closer than the estimated mean fragment size (recommended for histone data)
    #[arg(short, long)]
    pub merge: bool,

    /// Do not merge overlapping bins before filtering by p-value
    #[arg(long = "no-merge-bin")]
    pub no_merge_bin: bool,

    /// Housekeeping genes (BED format) used for normalizing
    #[arg(long = "housekeeping-genes", value_name = "FILE")]
    pub housekeeping_genes: Option<PathBuf>,

    /// Store files in output directory [default: current directory]
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Generate HTML report about experiment
    #[arg(long)]
    pub report: bool,

    /// Blacklisted genomic regions avoided for analysis (BED format)
    #[arg(long, value_name = "FILE")]
    pub deadzones: Option<PathBuf>,

    /// Do not use multiple test correction for p-values (Benjamini/Hochberg)
    #[arg(long = "no-correction")]
    pub no_correction: bool,

    /// P-value cutoff for peak detection; call only peaks with p-value lower than cutoff
    #[arg(short = 'p', long = "pvalue", default_value_t = 0.1)]
    pub pcutoff: f64,

    /// Read extension size for each signal BAM file; estimated if not given
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub exts: Option<Vec<u32>>,

    /// Read extension size for each input-DNA BAM file; estimated if not given
    #[arg(long = "exts-inputs", value_delimiter = ',', value_name = "LIST")]
    pub exts_inputs: Option<Vec<u32>>,

    /// Normalization factor for each input-DNA file; estimated if not given
    #[arg(long = "factors-inputs", value_delimiter = ',', value_name = "LIST")]
    pub factors_inputs: Option<Vec<f64>>,

    /// Scaling factor for each signal BAM file; TMM or housekeeping normalization if not given
    #[arg(long = "scaling-factors", value_delimiter = ',', value_name = "LIST")]
    pub scaling_factors: Option<Vec<f64>>,

    /// Save input-DNA file if available
    #[arg(long = "save-input")]
    pub save_input: bool,

    /// Restrict HMM training and peak search to these regions (BED format)
    #[arg(long, value_name = "FILE")]
    pub regions: Option<PathBuf>,

    /// Size of underlying bins for creating the signal
    #[arg(short, long, default_value_t = 100)]
    pub binsize: u32,

    /// Step size of the sliding window creating the signal
    #[arg(short, long = "step", default_value_t = 50)]
    pub stepsize: u32,

    /// Output debug information (space consuming) and debug logging
    #[arg(long)]
    pub debug: bool,

    /// Do not normalize towards GC content
    #[arg(long = "no-gc-content")]
    pub no_gc_content: bool,

    /// Restrict normalization to particular regions (BED format)
    #[arg(long = "norm-regions", value_name = "FILE")]
    pub norm_regions: Option<PathBuf>,

    /// Fold change parameter to define the training set (t_1)
    #[arg(short, long, default_value_t = 1.6)]
    pub foldchange: f64,

    /// Minimum signal support for differential peaks in the training set, as percentage (t_2)
    #[arg(short, long, default_value_t = 95.0)]
    pub threshold: f64,

    /// Number of bins the HMM's training set consists of
    #[arg(long = "size", default_value_t = 1000)]
    pub size_ts: u32,

    /// Percentile for p-value postprocessing filter
    #[arg(long, default_value_t = 1)]
    pub par: u32,

    /// Use binomial distribution as emission
    #[arg(long)]
    pub poisson: bool,

    /// Allow single strand BAM file as input
    #[arg(long = "single-strand")]
    pub single_strand: bool,

    /// M threshold of percentile for training TMM
    #[arg(long = "m_threshold", default_value_t = 80)]
    pub m_threshold: u32,

    /// A threshold of percentile for training TMM
    #[arg(long = "a_threshold", default_value_t = 95)]
    pub a_threshold: u32,

    /// Remove duplicate reads
    #[arg(long)]
    pub rmdup: bool,

    /// Answer yes to the prompt about deleting existing results
    #[arg(short = 'y', long, conflicts_with = "no")]
    pub yes: bool,

    /// Answer no to the prompt about deleting existing results
    #[arg(long)]
    pub no: bool,

    /// Print the assembled run configuration as JSON
    #[arg(long = "print-config")]
    pub print_config: bool,

    /// Enable verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Args {
    /// Answer to assume for the overwrite prompt, if any
    pub fn assumed_answer(&self) -> Option<bool> {
        match (self.yes, self.no) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Log filter matching the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["thor", "exp.config"]).unwrap();
        assert_eq!(args.config, PathBuf::from("exp.config"));
        assert_eq!(args.pcutoff, 0.1);
        assert_eq!(args.binsize, 100);
        assert_eq!(args.stepsize, 50);
        assert_eq!(args.foldchange, 1.6);
        assert_eq!(args.threshold, 95.0);
        assert_eq!(args.size_ts, 1000);
        assert_eq!(args.par, 1);
        assert_eq!(args.m_threshold, 80);
        assert_eq!(args.a_threshold, 95);
        assert!(args.exts.is_none());
        assert!(args.name.is_none());
        assert_eq!(args.assumed_answer(), None);
        assert_eq!(args.log_level(), "warn");
    }

    #[test]
    fn test_comma_lists() {
        let args = Args::try_parse_from([
            "thor",
            "exp.config",
            "--exts",
            "10,20,30,40",
            "--scaling-factors",
            "1.0,0.5",
            "--m_threshold",
            "70",
        ])
        .unwrap();
        assert_eq!(args.exts, Some(vec![10, 20, 30, 40]));
        assert_eq!(args.scaling_factors, Some(vec![1.0, 0.5]));
        assert_eq!(args.m_threshold, 70);
    }

    #[test]
    fn test_bad_list_element_is_usage_error() {
        let err = Args::try_parse_from(["thor", "exp.config", "--exts", "10,x"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_config_is_usage_error() {
        let err = Args::try_parse_from(["thor"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_version_exits_zero() {
        let err = Args::try_parse_from(["thor", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        assert_eq!(err.exit_code(), 0);
    }

    #[test]
    fn test_assume_flags() {
        let args = Args::try_parse_from(["thor", "exp.config", "-y"]).unwrap();
        assert_eq!(args.assumed_answer(), Some(true));
        let args = Args::try_parse_from(["thor", "exp.config", "--no"]).unwrap();
        assert_eq!(args.assumed_answer(), Some(false));
        assert!(Args::try_parse_from(["thor", "exp.config", "--yes", "--no"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let args = Args::try_parse_from(["thor", "exp.config", "-v"]).unwrap();
        assert_eq!(args.log_level(), "info");
        let args = Args::try_parse_from(["thor", "exp.config", "-v", "--debug"]).unwrap();
        assert_eq!(args.log_level(), "debug");
        assert!(args.debug);
    }
}
