//! Source and sink connectors
//!
//! The source splits the delimited personnel file into [`RawRecord`]s. Sinks
//! receive [`NormalizedRecord`]s and store them as documents.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::record::{FIELD_NAMES, NormalizedRecord, RawRecord};

/// Trait for document sinks (the load step)
#[async_trait]
pub trait DocumentSink: Send {
    /// Human-readable label used in logs and the completion message
    fn describe(&self) -> String;

    /// Store a batch of documents, returning how many were written
    async fn insert_many(&mut self, documents: &[NormalizedRecord]) -> Result<u64>;
}

/// Sink configuration from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SinkConfig {
    /// JSON-lines file, for local development and testing
    File(FileSinkConfig),

    /// PostgreSQL, storing each document as JSONB
    Postgres(PostgresSinkConfig),
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Postgres(PostgresSinkConfig::default())
    }
}

/// File sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSinkConfig {
    /// Output path
    pub path: String,
}

/// PostgreSQL sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresSinkConfig {
    /// Server URL without a database; ignored in local mode
    #[serde(default)]
    pub url: Option<String>,

    /// Database name
    #[serde(default = "default_database")]
    pub database: String,

    /// Collection (table) name
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for PostgresSinkConfig {
    fn default() -> Self {
        Self {
            url: None,
            database: default_database(),
            collection: default_collection(),
        }
    }
}

fn default_database() -> String {
    "etl_db".to_string()
}

fn default_collection() -> String {
    "employees".to_string()
}

// ============================================================================
// Delimited source (extraction)
// ============================================================================

/// Reads a header-less delimited file into raw records
#[derive(Debug, Clone)]
pub struct DelimitedSource {
    path: PathBuf,
    delimiter: u8,
}

impl DelimitedSource {
    /// Create a source for `path` split on `delimiter`
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    /// Path of the source file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in file order.
    ///
    /// Blank lines are skipped. Any other line must have exactly
    /// [`FIELD_NAMES`]`.len()` fields.
    pub fn extract(&self) -> Result<Vec<RawRecord>> {
        tracing::debug!("Reading {}", self.path.display());
        let file = std::fs::File::open(&self.path)?;
        self.extract_from(file)
    }

    /// Read records from any reader (used by [`extract`](Self::extract)).
    ///
    /// A field that starts with `"` is a quoted field: the surrounding quotes
    /// are removed and the delimiter may appear inside it. Quotes anywhere
    /// else are kept verbatim.
    pub fn extract_from<R: std::io::Read>(&self, input: R) -> Result<Vec<RawRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .flexible(true)
            .from_reader(input);

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();

            if row.len() == 1 && row[0].trim().is_empty() {
                continue;
            }

            let found = row.len();
            let record = RawRecord::from_fields(row.iter()).ok_or_else(|| Error::Extract {
                line,
                message: format!("expected {} fields, found {found}", FIELD_NAMES.len()),
            })?;
            records.push(record);
        }

        tracing::info!(
            "Extracted {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

// ============================================================================
// File sink (for local dev/testing)
// ============================================================================

/// Writes one JSON document per line
pub struct FileSink {
    config: FileSinkConfig,
    writer: Option<BufWriter<std::fs::File>>,
}

impl FileSink {
    /// Create a new file sink
    pub fn new(config: FileSinkConfig) -> Self {
        Self {
            config,
            writer: None,
        }
    }

    fn writer(&mut self) -> Result<&mut BufWriter<std::fs::File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => {
                if let Some(parent) = Path::new(&self.config.path).parent() {
                    std::fs::create_dir_all(parent)?;
                }
                BufWriter::new(std::fs::File::create(&self.config.path)?)
            }
        };
        Ok(self.writer.insert(writer))
    }
}

#[async_trait]
impl DocumentSink for FileSink {
    fn describe(&self) -> String {
        format!("file {}", self.config.path)
    }

    async fn insert_many(&mut self, documents: &[NormalizedRecord]) -> Result<u64> {
        let writer = self.writer()?;
        for document in documents {
            serde_json::to_writer(&mut *writer, document)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(documents.len() as u64)
    }
}
