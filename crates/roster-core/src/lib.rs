//! Roster Core Library
//!
//! This crate provides the record-level logic of the Roster personnel ETL:
//! - Field validation and birth-date correction
//! - Address normalization
//! - Derived attributes (age, salary bucket, formatted salary, full name)
//! - Per-record transformation and the batch pipeline runner
//! - Configuration, the delimited source, and document sinks
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Delimited  │────▶│  Transform  │────▶│  Document   │
//! │   Source    │     │  Pipeline   │     │    Sink     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_core::{PipelineRunner, RecordTransformer};
//! use roster_core::connectors::DelimitedSource;
//!
//! let raw = DelimitedSource::new("/data/member-data.txt", b'|').extract()?;
//! let runner = PipelineRunner::new(RecordTransformer::default());
//! for record in runner.run(&raw)? {
//!     println!("{} ({:?})", record.full_name, record.age);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod config;
pub mod connectors;
pub mod enrich;
pub mod error;
pub mod pipeline;
pub mod record;
pub mod transform;
pub mod validator;

pub use address::Address;
pub use config::{Config, ProjectConfig};
pub use error::{Error, Result};
pub use pipeline::{PipelineRunner, RunReport};
pub use record::{NormalizedRecord, RawRecord, SalaryBucket};
pub use transform::RecordTransformer;
