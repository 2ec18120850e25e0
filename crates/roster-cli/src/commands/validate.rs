//! Validate configuration and source data without loading

use anyhow::{Context, Result};
use roster_core::Config;
use roster_core::config::OnErrorBehavior;
use roster_runtime::Runtime;

/// Run the validate command
pub async fn run(config_path: &str, input: Option<&str>) -> Result<()> {
    tracing::info!("Validating configuration: {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;

    tracing::info!("✓ Project: {}", config.project.name);
    tracing::info!("✓ Version: {}", config.project.version);
    tracing::info!("✓ Reference date: {}", config.project.reference_date);
    tracing::info!("✓ Runtime mode: {:?}", config.project.runtime.mode);
    tracing::info!("✓ On error: {:?}", config.project.error_handling.on_error);

    // Report every failing record instead of stopping at the first
    let mut runtime = Runtime::new(config).with_on_error(OnErrorBehavior::LogAndSkip);
    if let Some(path) = input {
        runtime = runtime.with_source_path(path);
    }

    let raw = runtime.extract()?;
    let report = runtime.transform(&raw)?;

    for failure in &report.failures {
        tracing::warn!("✗ record {}: {}", failure.position, failure.error);
    }
    tracing::info!(
        "✓ {} of {} records transform cleanly",
        report.records.len(),
        report.total()
    );

    println!(
        "Validated {} records ({} invalid).",
        report.total(),
        report.failures.len()
    );
    Ok(())
}
