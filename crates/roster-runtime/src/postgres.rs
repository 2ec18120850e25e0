//! PostgreSQL document sink
//!
//! Each collection is a table holding one JSONB document per row. The table
//! and database are created on first use.

use async_trait::async_trait;
use roster_core::connectors::{DocumentSink, PostgresSinkConfig};
use roster_core::{Error as CoreError, NormalizedRecord, Result as CoreResult};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{ConnectOptions, Executor, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;

use crate::error::Result;

/// Documents per INSERT statement (Postgres caps bind parameters at 65535)
pub const BATCH_SIZE: usize = 1000;

/// Maintenance database used to create the target database
const MAINTENANCE_DB: &str = "postgres";

/// Sink that bulk-inserts documents into a Postgres table
pub struct PostgresSink {
    pool: PgPool,
    database: String,
    collection: String,
    table_ready: bool,
}

impl PostgresSink {
    /// Connect to `url`, creating the configured database if it is missing
    pub async fn connect(url: &str, config: &PostgresSinkConfig) -> Result<Self> {
        let server = PgConnectOptions::from_str(url)?;

        ensure_database(&server, &config.database).await?;

        tracing::debug!(
            "Connecting to database '{}' on {}:{}",
            config.database,
            server.get_host(),
            server.get_port()
        );
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(server.database(&config.database))
            .await?;

        Ok(Self::from_pool(pool, config))
    }

    /// Use an existing pool; the pool must already point at the target database
    pub fn from_pool(pool: PgPool, config: &PostgresSinkConfig) -> Self {
        Self {
            pool,
            database: config.database.clone(),
            collection: config.collection.clone(),
            table_ready: false,
        }
    }

    async fn ensure_table(&mut self) -> std::result::Result<(), sqlx::Error> {
        if !self.table_ready {
            self.pool
                .execute(create_table_sql(&self.collection).as_str())
                .await?;
            self.table_ready = true;
        }
        Ok(())
    }

    fn sink_error(&self, err: sqlx::Error) -> CoreError {
        CoreError::Sink {
            sink: self.describe(),
            message: err.to_string(),
        }
    }
}

#[async_trait]
impl DocumentSink for PostgresSink {
    fn describe(&self) -> String {
        format!("postgres {}.{}", self.database, self.collection)
    }

    async fn insert_many(&mut self, documents: &[NormalizedRecord]) -> CoreResult<u64> {
        if documents.is_empty() {
            return Ok(0);
        }
        self.ensure_table().await.map_err(|e| self.sink_error(e))?;

        let mut inserted = 0;
        for batch in documents.chunks(BATCH_SIZE) {
            let result = insert_query(&self.collection, batch)
                .build()
                .execute(&self.pool)
                .await
                .map_err(|e| self.sink_error(e))?;
            inserted += result.rows_affected();
            tracing::debug!("Inserted batch of {} into {}", batch.len(), self.collection);
        }
        Ok(inserted)
    }
}

async fn ensure_database(server: &PgConnectOptions, database: &str) -> Result<()> {
    let mut conn = server.clone().database(MAINTENANCE_DB).connect().await?;

    let exists: Option<i32> = sqlx::query_scalar("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(database)
        .fetch_optional(&mut conn)
        .await?;

    if exists.is_none() {
        tracing::info!("Creating database '{}'", database);
        conn.execute(format!("CREATE DATABASE {}", quote_ident(database)).as_str())
            .await?;
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn create_table_sql(collection: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         id BIGSERIAL PRIMARY KEY, \
         document JSONB NOT NULL, \
         loaded_at TIMESTAMPTZ NOT NULL DEFAULT now())",
        quote_ident(collection)
    )
}

fn insert_query<'a>(
    collection: &str,
    documents: &'a [NormalizedRecord],
) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} (document) ",
        quote_ident(collection)
    ));
    builder.push_values(documents, |mut row, document| {
        row.push_bind(Json(document));
    });
    builder
}
