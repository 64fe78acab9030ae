//! Record comparison for collection-diff.
//!
//! This crate pairs the records of two same-named collections by a configured
//! composite key and reports what differs between them.
//!
//! # Modules
//!
//! - [`key`] - match key derivation (record → [`MatchKey`])
//! - [`comparable`] - normalized record form used for equality testing
//! - [`compare`] - grouping and the key-set comparison itself
//! - [`stats`] - summary statistics derived from a comparison
//! - [`report`] - text rendering of per-collection reports and summary blocks
//! - [`config`] - per-collection match keys and exclusions
//! - [`source`] - the [`RecordSource`] trait stores implement
//!
//! # Example
//!
//! ```ignore
//! use collection_diff_core::{compare_records, CompareConfig, ComparisonStats};
//!
//! let config = CompareConfig::from_file("compare.yaml")?;
//! let rules = config.rules_for("libioVuln");
//! let comparison = compare_records("libioVuln", source_docs, target_docs, &rules);
//! let stats = ComparisonStats::from_comparison(&comparison);
//! println!("{:.2}% matching", stats.matching_percentage);
//! ```

pub mod comparable;
pub mod compare;
pub mod config;
pub mod key;
pub mod report;
pub mod source;
pub mod stats;

/// A single schema-less record as read from a store.
pub type Record = bson::Document;

pub use comparable::{Comparable, ComparableRecord, RecordDiff};
pub use compare::{compare_records, CollectionComparison, DifferentPair, Grouping, KeyedRecords};
pub use config::{CollectionRules, CompareConfig, ConfigError};
pub use key::{KeyValue, MatchKey};
pub use report::{Report, ReportLabels, Summary, SEPARATOR_WIDTH};
pub use source::RecordSource;
pub use stats::ComparisonStats;
