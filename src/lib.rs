//! collection-diff Library
//!
//! Tools around a pair of MongoDB databases that are expected to hold the same
//! data: compare them collection by collection, load a JSON array into a
//! collection, and harvest the advisory data such collections are built from.
//!
//! # Features
//!
//! - Collection comparison: records paired by configurable composite keys,
//!   per-collection text reports and a cumulative summary
//! - Collection loading: replace a collection with a JSON array file
//! - Advisory harvesting: paginated scrape of advisory patch links into the
//!   JSON shape the loader expects
//!
//! # CLI Usage
//!
//! ```bash
//! # Compare every configured collection of two databases
//! collection-diff compare --config compare.yaml \
//!   --source-database s5_snyk_libio --target-database export_s5_snyk_libio
//!
//! # Replace a collection with harvested data
//! collection-diff load --file snyk_maven_vulnerabilities.json \
//!   --database s5_snyk_libio --collection patchUrls
//!
//! # Harvest advisories
//! collection-diff harvest --output snyk_maven_vulnerabilities.json
//! ```

use clap::Args;
use std::path::PathBuf;

pub mod config;
pub mod output;
pub mod run;

/// Options of the `compare` command.
#[derive(Args, Clone, Debug)]
pub struct CompareArgs {
    /// Comparison config file (YAML) with collections, match keys and exclusions
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source MongoDB host
    #[arg(long, default_value = "localhost", env = "COLLECTION_DIFF_SOURCE_HOST")]
    pub source_host: String,

    /// Source MongoDB port
    #[arg(long, default_value = "27017", env = "COLLECTION_DIFF_SOURCE_PORT")]
    pub source_port: u16,

    /// Source database name (overrides the config file)
    #[arg(long, env = "COLLECTION_DIFF_SOURCE_DATABASE")]
    pub source_database: Option<String>,

    /// Target MongoDB host (default: the source host)
    #[arg(long, env = "COLLECTION_DIFF_TARGET_HOST")]
    pub target_host: Option<String>,

    /// Target MongoDB port (default: the source port)
    #[arg(long, env = "COLLECTION_DIFF_TARGET_PORT")]
    pub target_port: Option<u16>,

    /// Target database name (overrides the config file)
    #[arg(long, env = "COLLECTION_DIFF_TARGET_DATABASE")]
    pub target_database: Option<String>,

    /// Collections to compare (comma-separated, empty = config list, then every source collection)
    #[arg(long = "collection", value_delimiter = ',')]
    pub collections: Vec<String>,

    /// Directory for reports and summary.txt (default: comparison_results)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Truncate summary.txt before the first collection
    #[arg(long)]
    pub clear_summary: bool,

    /// Connect and server selection timeout, e.g. "10", "30s", "2m"
    #[arg(long, default_value = "10")]
    pub connect_timeout: String,
}

/// Options of the `load` command.
#[derive(Args, Clone, Debug)]
pub struct LoadArgs {
    /// JSON file holding an array of records
    #[arg(long, value_name = "PATH")]
    pub file: PathBuf,

    /// MongoDB host
    #[arg(long, default_value = "localhost", env = "COLLECTION_DIFF_HOST")]
    pub host: String,

    /// MongoDB port
    #[arg(long, default_value = "27017", env = "COLLECTION_DIFF_PORT")]
    pub port: u16,

    /// Database name
    #[arg(long, env = "COLLECTION_DIFF_DATABASE")]
    pub database: String,

    /// Collection to replace
    #[arg(long)]
    pub collection: String,

    /// Dry run mode - parse the file but don't touch the database
    #[arg(long)]
    pub dry_run: bool,

    /// Connect and server selection timeout, e.g. "10", "30s", "2m"
    #[arg(long, default_value = "10")]
    pub connect_timeout: String,
}

/// Options of the `harvest` command.
#[derive(Args, Clone, Debug)]
pub struct HarvestArgs {
    /// Output JSON file
    #[arg(long, default_value = "snyk_maven_vulnerabilities.json")]
    pub output: PathBuf,

    /// First listing page
    #[arg(long, default_value = "https://security.snyk.io/vuln/maven")]
    pub base_url: String,

    /// Prefix for relative advisory links
    #[arg(long, default_value = "https://security.snyk.io")]
    pub site_root: String,

    /// Stop after this many advisories
    #[arg(long, default_value = "700")]
    pub max_records: usize,

    /// Pause between advisory fetches in milliseconds
    #[arg(long, default_value = "100")]
    pub delay_ms: u64,

    /// File receiving fetch failures
    #[arg(long, default_value = "scraping_errors.log")]
    pub error_log: PathBuf,
}
