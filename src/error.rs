use std::path::PathBuf;
use thiserror::Error;

use crate::augment::WriteFailure;
use crate::pairing::PairingReport;

/// The main error type for detaug operations.
#[derive(Debug, Error)]
pub enum DetaugError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "Validation failed: {} matched pair(s), {} error(s)",
        report.pairs.len(),
        report.error_count()
    )]
    Validation { report: Box<PairingReport> },

    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write augmentation #{spec_index} ({suffix}) for '{base_name}': {source}")]
    Write {
        base_name: String,
        spec_index: usize,
        suffix: String,
        #[source]
        source: WriteFailure,
    },

    #[error("Invalid augmentation plan: {message}")]
    InvalidPlan { message: String },

    #[error("Failed to parse augmentation config {path}: {message}")]
    PlanConfigParse { path: PathBuf, message: String },

    #[error("Failed to start worker pool: {message}")]
    WorkerPool { message: String },

    #[error("Augmentation incomplete: {failed} of {attempted} pair(s) failed")]
    AugmentationIncomplete { failed: usize, attempted: usize },

    #[error("Failed to serialize report: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[cfg(feature = "archive")]
    #[error("Archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },
}

/// The per-pair step at which processing stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairStage {
    Decode,
    Read,
    Write,
}

impl DetaugError {
    /// The per-pair stage this error belongs to, if it is a per-pair error.
    pub fn stage(&self) -> Option<PairStage> {
        match self {
            DetaugError::Decode { .. } => Some(PairStage::Decode),
            DetaugError::Read { .. } => Some(PairStage::Read),
            DetaugError::Write { .. } => Some(PairStage::Write),
            _ => None,
        }
    }
}
