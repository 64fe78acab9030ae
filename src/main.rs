//! Command-line interface for collection-diff
//!
//! # Usage Examples
//!
//! ## Compare
//! ```bash
//! # Compare the collections listed in compare.yaml
//! collection-diff compare --config compare.yaml \
//!   --source-host localhost --source-port 42692 \
//!   --source-database s5_snyk_libio \
//!   --target-database export_s5_snyk_libio \
//!   --clear-summary
//!
//! # Compare two collections only, target on another server
//! collection-diff compare --config compare.yaml \
//!   --collection libioVuln,patchUrls \
//!   --target-host backup.internal --target-port 27018
//! ```
//!
//! ## Load
//! ```bash
//! collection-diff load --file snyk_maven_vulnerabilities.json \
//!   --database s5_snyk_libio --collection patchUrls
//! ```
//!
//! ## Harvest
//! ```bash
//! collection-diff harvest --max-records 700 \
//!   --output snyk_maven_vulnerabilities.json \
//!   --error-log scraping_errors.log
//! ```

use advisory_harvest::{write_records, HarvestOptions, Harvester, HttpFetcher};
use anyhow::Context;
use clap::{Parser, Subcommand};
use collection_diff::config::{duration::parse_duration, RunSettings};
use collection_diff::output::ReportWriter;
use collection_diff::run::{compare_all, resolve_collections};
use collection_diff::{CompareArgs, HarvestArgs, LoadArgs};
use collection_diff_mongodb::{connect, read_records, replace_collection, MongoRecordSource, StoreTarget};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "collection-diff")]
#[command(about = "Compare MongoDB collections across two databases, load JSON data, harvest advisories")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare same-named collections of a source and a target database
    Compare(CompareArgs),

    /// Replace a collection with the records of a JSON array file
    Load(LoadArgs),

    /// Harvest advisory patch links into a JSON array file
    Harvest(HarvestArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compare(args) => {
            init_tracing();
            run_compare(args).await
        }
        Commands::Load(args) => {
            init_tracing();
            run_load(args).await
        }
        Commands::Harvest(args) => {
            init_tracing_with_error_log(&args.error_log)?;
            run_harvest(args).await
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Console logging as usual, plus every ERROR event appended to `path`.
fn init_tracing_with_error_log(path: &Path) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open error log {path:?}"))?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_filter(EnvFilter::from_default_env()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::ERROR),
        )
        .init();
    Ok(())
}

async fn run_compare(args: CompareArgs) -> anyhow::Result<()> {
    let settings = RunSettings::resolve(&args)?;
    tracing::info!(
        "Comparing {} ({}) against {} ({})",
        settings.source.database,
        settings.source.uri(),
        settings.target.database,
        settings.target.uri()
    );

    let source = MongoRecordSource::new(
        connect(&settings.source, settings.connect_timeout)
            .await
            .context("Failed to connect to the source database")?,
    );
    let target = MongoRecordSource::new(
        connect(&settings.target, settings.connect_timeout)
            .await
            .context("Failed to connect to the target database")?,
    );

    let writer = ReportWriter::create(&settings.output_dir)?;
    if settings.clear_summary {
        writer.clear_summary()?;
    }

    let collections = resolve_collections(&source, &settings.collections).await?;
    compare_all(&source, &target, &collections, &settings.rules, &writer).await?;

    tracing::info!("Comparison completed; results in {:?}", writer.dir());
    Ok(())
}

async fn run_load(args: LoadArgs) -> anyhow::Result<()> {
    let records = read_records(&args.file)
        .with_context(|| format!("Failed to load records from {:?}", args.file))?;
    tracing::info!("Read {} records from {:?}", records.len(), args.file);

    if args.dry_run {
        tracing::info!("Running in dry-run mode - no data will be written");
        println!(
            "Dry run: {} records would replace {}.{}",
            records.len(),
            args.database,
            args.collection
        );
        return Ok(());
    }

    let target = StoreTarget::new(args.host, args.port, args.database);
    let timeout = parse_duration(&args.connect_timeout)
        .with_context(|| format!("Invalid --connect-timeout: {}", args.connect_timeout))?;
    let database = connect(&target, timeout).await?;

    let inserted = replace_collection(&database, &args.collection, records).await?;
    println!(
        "Loaded {} records into {}.{}",
        inserted, target.database, args.collection
    );
    Ok(())
}

async fn run_harvest(args: HarvestArgs) -> anyhow::Result<()> {
    let options = HarvestOptions {
        base_url: args.base_url,
        site_root: args.site_root,
        max_records: args.max_records,
        item_delay: Duration::from_millis(args.delay_ms),
    };

    let records = Harvester::new(HttpFetcher::new(), options).run().await;
    write_records(&args.output, &records)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    println!(
        "Harvest completed. Collected {} entries. Data saved to {}.",
        records.len(),
        args.output.display()
    );
    Ok(())
}
