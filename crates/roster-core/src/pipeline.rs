//! Pipeline runner
//!
//! Maps the transformer over a sequence of raw records. Records are
//! independent; output order always matches input order.

use crate::config::OnErrorBehavior;
use crate::error::{Error, Result};
use crate::record::{NormalizedRecord, RawRecord};
use crate::transform::RecordTransformer;

/// A record that was rejected during an isolated run
#[derive(Debug)]
pub struct RecordFailure {
    /// Zero-based position in the input
    pub position: usize,
    /// Why the record was rejected
    pub error: Error,
}

/// Outcome of running the pipeline with per-record isolation
#[derive(Debug, Default)]
pub struct RunReport {
    /// Successfully transformed records, in input order
    pub records: Vec<NormalizedRecord>,
    /// Rejected records, in input order
    pub failures: Vec<RecordFailure>,
}

impl RunReport {
    /// Number of records that went into the run
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }

    /// Whether every record was transformed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies a [`RecordTransformer`] to every record of a batch
#[derive(Debug, Clone, Default)]
pub struct PipelineRunner {
    transformer: RecordTransformer,
}

impl PipelineRunner {
    /// Create a runner around a transformer
    pub fn new(transformer: RecordTransformer) -> Self {
        Self { transformer }
    }

    /// The transformer applied to each record
    pub fn transformer(&self) -> &RecordTransformer {
        &self.transformer
    }

    /// Transform every record, aborting on the first failure.
    ///
    /// The error names the failing record's position and field. Nothing is
    /// returned for records that came before it.
    pub fn run(&self, records: &[RawRecord]) -> Result<Vec<NormalizedRecord>> {
        let out = records
            .iter()
            .enumerate()
            .map(|(position, raw)| {
                self.transformer
                    .transform(raw)
                    .map_err(|e| e.at_record(position))
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!("Transformed {} records", out.len());
        Ok(out)
    }

    /// Transform every record, collecting failures instead of aborting
    pub fn run_isolated(&self, records: &[RawRecord]) -> RunReport {
        let mut report = RunReport::default();

        for (position, raw) in records.iter().enumerate() {
            match self.transformer.transform(raw) {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    tracing::warn!(position, "Skipping record: {}", error);
                    report.failures.push(RecordFailure { position, error });
                }
            }
        }

        tracing::info!(
            "Transformed {} of {} records ({} skipped)",
            report.records.len(),
            report.total(),
            report.failures.len()
        );
        report
    }

    /// Run with the given error behavior.
    ///
    /// `StopOnError` returns the first failure as an error; `LogAndSkip`
    /// returns a report that may contain failures.
    pub fn execute(&self, records: &[RawRecord], on_error: OnErrorBehavior) -> Result<RunReport> {
        match on_error {
            OnErrorBehavior::StopOnError => Ok(RunReport {
                records: self.run(records)?,
                failures: Vec::new(),
            }),
            OnErrorBehavior::LogAndSkip => Ok(self.run_isolated(records)),
        }
    }
}
