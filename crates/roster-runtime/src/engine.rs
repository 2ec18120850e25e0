//! ETL execution engine

use anyhow::Context;
use roster_core::config::OnErrorBehavior;
use roster_core::connectors::{DelimitedSource, DocumentSink, FileSink, SinkConfig};
use roster_core::{Config, PipelineRunner, RawRecord, RecordTransformer, RunReport};
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::Result;
use crate::postgres::PostgresSink;

/// Counts from one completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Identifier attached to this run's log lines
    pub run_id: Uuid,
    /// Records read from the source
    pub extracted: usize,
    /// Documents written to the sink
    pub loaded: u64,
    /// Records rejected under `log_and_skip`
    pub skipped: usize,
    /// Sink label
    pub sink: String,
}

/// Runtime engine for a single extract → transform → load run
pub struct Runtime {
    config: Config,
    runner: PipelineRunner,
    source_path: PathBuf,
    on_error: OnErrorBehavior,
}

impl Runtime {
    /// Create a runtime from a loaded configuration
    pub fn new(config: Config) -> Self {
        let runner = PipelineRunner::new(RecordTransformer::new(config.project.reference_date));
        let source_path = config.source_path();
        let on_error = config.project.error_handling.on_error;
        Self {
            config,
            runner,
            source_path,
            on_error,
        }
    }

    /// Read from `path` instead of the configured source
    pub fn with_source_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_path = path.into();
        self
    }

    /// Override the configured record-level error behavior
    pub fn with_on_error(mut self, on_error: OnErrorBehavior) -> Self {
        self.on_error = on_error;
        self
    }

    /// The loaded configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read all raw records from the source file
    pub fn extract(&self) -> Result<Vec<RawRecord>> {
        let delimiter = self.config.project.source.delimiter_byte()?;
        DelimitedSource::new(&self.source_path, delimiter)
            .extract()
            .with_context(|| format!("Failed to extract {}", self.source_path.display()))
    }

    /// Transform raw records according to the error behavior
    pub fn transform(&self, raw: &[RawRecord]) -> Result<RunReport> {
        let report = self
            .runner
            .execute(raw, self.on_error)
            .context("Transformation aborted")?;
        Ok(report)
    }

    /// Extract, transform, and load into `sink`.
    ///
    /// Nothing is loaded when a record fails under `stop_on_error`.
    pub async fn run(&self, sink: &mut dyn DocumentSink) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let sink_label = sink.describe();
        tracing::info!(%run_id, "Starting run: {} -> {}", self.source_path.display(), sink_label);

        let raw = self.extract()?;
        let report = self.transform(&raw)?;

        let loaded = sink
            .insert_many(&report.records)
            .await
            .with_context(|| format!("Failed to load into {sink_label}"))?;

        tracing::info!(
            %run_id,
            extracted = raw.len(),
            loaded,
            skipped = report.failures.len(),
            "Run complete"
        );

        Ok(RunSummary {
            run_id,
            extracted: raw.len(),
            loaded,
            skipped: report.failures.len(),
            sink: sink_label,
        })
    }
}

/// Open the configured sink.
///
/// `postgres_url` overrides the configured URL (used for the local embedded
/// database).
pub async fn open_sink(
    config: &Config,
    postgres_url: Option<&str>,
) -> Result<Box<dyn DocumentSink>> {
    match config.sink() {
        SinkConfig::File(file) => Ok(Box::new(FileSink::new(file))),
        SinkConfig::Postgres(pg) => {
            let url = postgres_url
                .map(str::to_string)
                .or_else(|| pg.url.clone())
                .context("No PostgreSQL URL configured (set sink.url or use local mode)")?;
            let sink = PostgresSink::connect(&url, &pg)
                .await
                .context("Failed to connect to PostgreSQL")?;
            Ok(Box::new(sink))
        }
    }
}
