//! Comparison configuration.
//!
//! Match keys and exclusions are looked up per collection name. A name with
//! no entry gets an empty match key list (every record collapses into one
//! group) and no exclusions.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Configuration for a comparison run.
///
/// Loaded from a YAML file; every field is optional.
///
/// ```yaml
/// source_database: s5_snyk_libio
/// target_database: export_s5_snyk_libio
/// output_dir: comparison_results
/// collections: [libioVuln, patchUrls]
/// match_keys:
///   libioVuln: [cve_ref, snyk_url, vuln_gav]
///   patchUrls: [VulnUrl]
/// exclude_keys:
///   libioPackageVuln: [modifiedFileSrcBefore, modifiedFileSrcAfter]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompareConfig {
    /// Database holding the source side of every collection
    pub source_database: Option<String>,

    /// Database holding the target side of every collection
    pub target_database: Option<String>,

    /// Directory receiving the per-collection reports and `summary.txt`
    pub output_dir: Option<PathBuf>,

    /// Collections to compare, in order
    pub collections: Vec<String>,

    /// Fields that jointly identify a record, per collection
    pub match_keys: HashMap<String, Vec<String>>,

    /// Fields ignored when deciding whether matched records differ, per collection
    pub exclude_keys: HashMap<String, Vec<String>>,
}

impl CompareConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Set the match keys for a collection.
    pub fn with_match_keys<I, S>(mut self, collection: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.match_keys
            .insert(collection.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    /// Set the excluded fields for a collection.
    pub fn with_exclusions<I, S>(mut self, collection: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_keys
            .insert(collection.into(), keys.into_iter().map(Into::into).collect());
        self
    }

    /// Rules applying to `collection`, falling back to empty ones.
    pub fn rules_for(&self, collection: &str) -> CollectionRules {
        CollectionRules {
            match_keys: self.match_keys.get(collection).cloned().unwrap_or_default(),
            excluded: self
                .exclude_keys
                .get(collection)
                .map(|keys| keys.iter().cloned().collect())
                .unwrap_or_default(),
        }
    }
}

/// Match keys and exclusions resolved for one collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionRules {
    pub match_keys: Vec<String>,
    pub excluded: BTreeSet<String>,
}

impl CollectionRules {
    pub fn new<I, S>(match_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            match_keys: match_keys.into_iter().map(Into::into).collect(),
            excluded: BTreeSet::new(),
        }
    }

    pub fn excluding<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(fields.into_iter().map(Into::into));
        self
    }
}
