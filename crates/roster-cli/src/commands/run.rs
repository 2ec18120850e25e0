//! Run the ETL: extract, transform, load

use anyhow::{Context, Result};
use roster_core::Config;
use roster_core::config::{OnErrorBehavior, RuntimeMode};
use roster_core::connectors::SinkConfig;
use roster_runtime::{Runtime, open_sink};

use crate::local_db::LocalDatabase;

/// Run the full pipeline once
pub async fn run(config_path: &str, input: Option<&str>, skip_invalid: bool) -> Result<()> {
    tracing::info!("Loading configuration from {}", config_path);

    let config = Config::load(config_path).context("Failed to load configuration")?;

    tracing::info!("Project: {}", config.project.name);

    // Held until the run finishes; dropping it stops the server.
    let local_db = match (&config.project.sink, config.project.runtime.mode) {
        (SinkConfig::Postgres(pg), RuntimeMode::Local) => Some(
            LocalDatabase::start(
                &config.project.runtime.local,
                &config.base_path,
                &pg.database,
            )
            .await?,
        ),
        _ => None,
    };
    let local_url = local_db.as_ref().map(LocalDatabase::url);

    let mut sink = open_sink(&config, local_url.as_deref()).await?;

    let mut runtime = Runtime::new(config);
    if let Some(path) = input {
        runtime = runtime.with_source_path(path);
    }
    if skip_invalid {
        runtime = runtime.with_on_error(OnErrorBehavior::LogAndSkip);
    }

    let summary = runtime.run(sink.as_mut()).await?;

    if summary.skipped > 0 {
        tracing::warn!("{} records were skipped", summary.skipped);
    }
    println!("Data successfully loaded into {}.", summary.sink);
    Ok(())
}
