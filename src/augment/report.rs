//! Run report types for a whole augmentation run.

use serde::Serialize;
use std::fmt;

use crate::error::{DetaugError, PairStage};

/// Aggregate outcome of running the engine over all matched pairs.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunReport {
    /// Specs applied to each image.
    pub plan_len: usize,
    /// Pairs handed to the engine.
    pub pairs_attempted: usize,
    /// Pairs that produced a full set of artifacts.
    pub pairs_succeeded: usize,
    /// Images written by succeeded pairs.
    pub images_written: usize,
    /// Labels written by succeeded pairs.
    pub labels_written: usize,
    /// One entry per failed pair, in pair order.
    pub failures: Vec<PairFailure>,
}

impl RunReport {
    pub fn new(plan_len: usize) -> Self {
        Self {
            plan_len,
            ..Default::default()
        }
    }

    /// Number of pairs that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True when every attempted pair succeeded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Augmented {} of {} pair(s) with {} augmentation(s) each",
            self.pairs_succeeded, self.pairs_attempted, self.plan_len
        )?;
        writeln!(
            f,
            "  {} image(s), {} label(s) written",
            self.images_written, self.labels_written
        )?;

        if !self.failures.is_empty() {
            writeln!(f)?;
            writeln!(f, "Failures ({}):", self.failures.len())?;
            for failure in &self.failures {
                writeln!(f, "  - {}", failure)?;
            }
        }

        Ok(())
    }
}

/// One pair that did not complete.
#[derive(Clone, Debug, Serialize)]
pub struct PairFailure {
    pub base_name: String,
    /// Where processing stopped; `None` for failures outside the pair stages.
    pub stage: Option<PairStage>,
    /// Plan index of the spec being written, for write failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_index: Option<usize>,
    pub message: String,
}

impl PairFailure {
    pub fn from_error(base_name: impl Into<String>, error: &DetaugError) -> Self {
        let spec_index = match error {
            DetaugError::Write { spec_index, .. } => Some(*spec_index),
            _ => None,
        };
        Self {
            base_name: base_name.into(),
            stage: error.stage(),
            spec_index,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for PairFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.stage, self.spec_index) {
            (Some(stage), Some(index)) => write!(
                f,
                "{} [{:?} at #{}]: {}",
                self.base_name, stage, index, self.message
            ),
            (Some(stage), None) => write!(f, "{} [{:?}]: {}", self.base_name, stage, self.message),
            (None, _) => write!(f, "{}: {}", self.base_name, self.message),
        }
    }
}
