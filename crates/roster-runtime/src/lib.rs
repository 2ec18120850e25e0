//! Roster Runtime
//!
//! This crate runs the Roster ETL end to end: it reads the configured source
//! file, transforms every record with `roster-core`, and loads the
//! normalized documents into the configured sink.
//!
//! # Features
//!
//! - Run engine with per-run identifiers and counts
//! - PostgreSQL document sink (JSONB collections)
//! - Sink selection from configuration
//!
//! # Usage
//!
//! ```rust,ignore
//! use roster_runtime::{Runtime, open_sink};
//!
//! let mut sink = open_sink(&config, None).await?;
//! let summary = Runtime::new(config).run(sink.as_mut()).await?;
//! println!("loaded {}", summary.loaded);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod engine;
pub mod error;
pub mod postgres;

pub use engine::{RunSummary, Runtime, open_sink};
pub use error::{Error, Result};
pub use postgres::PostgresSink;
