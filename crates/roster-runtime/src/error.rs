//! Runtime error types
//!
//! Record-level failures stay typed as [`roster_core::Error`] inside the
//! chain, so callers can `downcast_ref` to find the failing record.

/// Result type for runtime operations
pub type Result<T> = anyhow::Result<T>;

/// Runtime error (anyhow for application-level errors)
pub type Error = anyhow::Error;
