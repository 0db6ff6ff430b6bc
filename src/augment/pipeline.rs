//! Running the engine over every matched pair.
//!
//! Pairs are independent: their outputs never share a file name, and a failed
//! pair never stops its siblings. Counts are aggregated only after every pair
//! has finished, in pair order, whichever [`Execution`] mode is used.

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use super::report::{PairFailure, RunReport};
use super::{AugmentationEngine, PairOutcome};
use crate::error::DetaugError;
use crate::pairing::{FilePair, PairingReport};

/// How pairs are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Execution {
    /// One pair at a time, in order.
    #[default]
    Sequential,
    /// Pairs spread over a pool of `jobs` worker threads.
    Parallel { jobs: usize },
}

impl Execution {
    /// `Sequential` for zero or one job, `Parallel` otherwise.
    pub fn from_jobs(jobs: usize) -> Self {
        if jobs <= 1 {
            Execution::Sequential
        } else {
            Execution::Parallel { jobs }
        }
    }
}

/// Receives progress events. Purely observational.
pub trait PipelineObserver: Sync {
    fn mismatch_summary(&self, _report: &PairingReport) {}
    fn pair_started(&self, _pair: &FilePair) {}
    fn pair_completed(&self, _outcome: &PairOutcome) {}
    fn pair_failed(&self, _pair: &FilePair, _error: &DetaugError) {}
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Emits one `tracing` event per pipeline event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn mismatch_summary(&self, report: &PairingReport) {
        info!(
            images = report.image_count,
            labels = report.label_count,
            matched = report.pairs.len(),
            images_without_labels = report.mismatches.images_without_labels.len(),
            labels_without_images = report.mismatches.labels_without_images.len(),
            "pairing complete"
        );
        for name in &report.mismatches.images_without_labels {
            warn!(base_name = %name, "skipping image without label");
        }
    }

    fn pair_started(&self, pair: &FilePair) {
        info!(base_name = %pair.base_name, image = %pair.image_path.display(), "augmenting");
    }

    fn pair_completed(&self, outcome: &PairOutcome) {
        info!(base_name = %outcome.base_name, written = outcome.written(), "pair done");
    }

    fn pair_failed(&self, pair: &FilePair, error: &DetaugError) {
        warn!(base_name = %pair.base_name, error = %error, "pair skipped");
    }
}

/// Run `engine` over `pairs` and aggregate the outcome.
///
/// Only setup problems (output roots, worker pool) are returned as errors;
/// per-pair failures end up in [`RunReport::failures`].
pub fn run_pipeline(
    pairs: &[FilePair],
    engine: &AugmentationEngine,
    execution: Execution,
    observer: &dyn PipelineObserver,
) -> Result<RunReport, DetaugError> {
    engine.writer().prepare()?;

    let process = |pair: &FilePair| {
        observer.pair_started(pair);
        let result = engine.process_pair(pair);
        match &result {
            Ok(outcome) => observer.pair_completed(outcome),
            Err(error) => observer.pair_failed(pair, error),
        }
        result
    };

    let results: Vec<Result<PairOutcome, DetaugError>> = match execution {
        Execution::Sequential => pairs.iter().map(process).collect(),
        Execution::Parallel { jobs } => {
            let pool = ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build()
                .map_err(|source| DetaugError::WorkerPool {
                    message: source.to_string(),
                })?;
            pool.install(|| pairs.par_iter().map(process).collect())
        }
    };

    let mut report = RunReport::new(engine.plan().len());
    report.pairs_attempted = pairs.len();

    for (pair, result) in pairs.iter().zip(results) {
        match result {
            Ok(outcome) => {
                report.pairs_succeeded += 1;
                report.images_written += outcome.images.len();
                report.labels_written += outcome.labels.len();
            }
            Err(error) => report
                .failures
                .push(PairFailure::from_error(pair.base_name.as_str(), &error)),
        }
    }

    Ok(report)
}
