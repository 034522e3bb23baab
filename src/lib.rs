//! # THOR setup - run configuration for differential peak calling
//!
//! Reads the block-tagged experiment description and the command line,
//! checks them against each other and prepares the output directory tree.
//! The result is a single [`setup::RunConfig`] handed to the peak calling
//! pipeline.

pub mod blocks;
pub mod cli;
pub mod dims;
pub mod experiment;
pub mod naming;
pub mod options;
pub mod output;
pub mod paths;
pub mod setup;

pub use dims::Dimensions;
pub use experiment::ExperimentDescription;
pub use options::RunOptions;
pub use output::{AssumeAnswer, Confirm, OutputLayout, Prompt};
pub use setup::{configure, RunConfig};

/// Error types for the THOR setup library
#[derive(Debug, thiserror::Error)]
pub enum ThorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Usage(String),

    #[error("{kind} file {path} does not exist!")]
    MissingFile { kind: &'static str, path: String },

    #[error("Number of values for {option} must equal number of BAM files: expected {expected}, got {found}")]
    DimensionMismatch {
        option: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Conditions have different numbers of replicates: rep1 has {rep1}, rep2 has {rep2}")]
    ReplicateMismatch { rep1: usize, rep2: usize },

    #[error("{0}")]
    DirectoryConflict(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ThorError {
    /// Process exit status for this kind of failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ThorError::Io(_) => 1,
            ThorError::Usage(_) => 2,
            ThorError::MissingFile { .. } => 3,
            ThorError::DimensionMismatch { .. } | ThorError::ReplicateMismatch { .. } => 4,
            ThorError::DirectoryConflict(_) => 5,
            ThorError::InvalidConfig(_) => 6,
        }
    }
}

pub type ThorResult<T> = Result<T, ThorError>;
