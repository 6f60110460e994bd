pub mod cli;
pub mod config;
pub mod formatter;
pub mod inspector;
pub mod models;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::io::Write;

use self::cli::Cli;
use self::config::{resolve_config, AppConfig, OutputTarget, SchemaFilter};
use self::formatter::{header_comments, summarize, OutputGenerator};
use self::inspector::Inspector;
use self::models::{ColumnRecord, ForeignKeyRecord, RenderedDocument};

async fn scan(inspector: &Inspector<'_>) -> Result<(Vec<ColumnRecord>, Vec<ForeignKeyRecord>)> {
    tracing::info!("Fetching tables and columns");
    let columns = inspector.columns().await?;
    let found = summarize(&columns, &[]);
    tracing::info!("Found {} tables with {} columns", found.tables, found.columns);

    tracing::info!("Fetching foreign key relationships");
    let foreign_keys = inspector.foreign_keys().await?;
    if !foreign_keys.is_empty() {
        tracing::info!("Found {} foreign key relationships", foreign_keys.len());
    }

    Ok((columns, foreign_keys))
}

/// Runs both catalog queries, then closes the pool whether or not they succeeded.
pub async fn scan_catalog(
    pool: PgPool,
    filter: &SchemaFilter,
) -> Result<(Vec<ColumnRecord>, Vec<ForeignKeyRecord>)> {
    let scanned = scan(&Inspector::new(&pool, filter)).await;
    pool.close().await;
    scanned
}

// Connects, Scans, and Formats in one go.
pub async fn generate_document(config: &AppConfig, generated_at: &str) -> Result<RenderedDocument> {
    tracing::info!("Connecting to database {} on {}", config.database, config.server);
    tracing::info!("Scanning {}", config.schema_filter);

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(config.connect_options.clone())
        .await
        .context("Failed to connect to database")?;

    let (columns, foreign_keys) = scan_catalog(pool, &config.schema_filter).await?;

    let header = header_comments(&config.database, &config.server, generated_at);
    Ok(OutputGenerator::generate_dbml(&header, &columns, &foreign_keys))
}

pub fn write_document(output: &OutputTarget, document: &RenderedDocument) -> Result<()> {
    match output {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(document.text.as_bytes())
                .and_then(|_| stdout.flush())
                .context("Failed to write to stdout")
        }
        OutputTarget::File(path) => std::fs::write(path, &document.text)
            .with_context(|| format!("Failed to write {}", path.display())),
    }
}

pub async fn run(args: Cli) -> Result<()> {
    // 1. Resolve Config
    let config = resolve_config(args)?;

    // 2. Generate
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let document = generate_document(&config, &generated_at).await?;

    // 3. Output
    write_document(&config.output, &document)?;

    let summary = document.summary;
    tracing::info!("Generated {}", config.output);
    tracing::info!(
        "Tables: {}, Columns: {}, Foreign Keys: {}",
        summary.tables,
        summary.columns,
        summary.foreign_keys
    );
    tracing::info!("View your diagram at https://dbdiagram.io/");

    Ok(())
}
