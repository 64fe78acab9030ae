//! Run configuration for the `compare` command.
//!
//! Command-line values win over the config file; unset values fall back to
//! the config file and then to built-in defaults.

pub mod duration;

use crate::CompareArgs;
use anyhow::Context;
use collection_diff_core::CompareConfig;
use collection_diff_mongodb::StoreTarget;
use std::path::PathBuf;
use std::time::Duration;

/// Output directory used when neither the CLI nor the config file names one.
pub const DEFAULT_OUTPUT_DIR: &str = "comparison_results";

/// Fully resolved settings of one comparison run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub source: StoreTarget,
    pub target: StoreTarget,
    pub output_dir: PathBuf,
    /// Explicitly requested collections; empty means "every source collection".
    pub collections: Vec<String>,
    pub clear_summary: bool,
    pub connect_timeout: Duration,
    pub rules: CompareConfig,
}

impl RunSettings {
    /// Resolve settings from CLI arguments, loading the config file if given.
    pub fn resolve(args: &CompareArgs) -> anyhow::Result<Self> {
        let rules = match &args.config {
            Some(path) => CompareConfig::from_file(path)
                .with_context(|| format!("Failed to load comparison config from {path:?}"))?,
            None => CompareConfig::default(),
        };
        Self::from_parts(args, rules)
    }

    /// Resolve settings against an already-loaded config.
    pub fn from_parts(args: &CompareArgs, rules: CompareConfig) -> anyhow::Result<Self> {
        let source_database = args
            .source_database
            .clone()
            .or_else(|| rules.source_database.clone())
            .ok_or_else(|| anyhow::anyhow!("Source database name is required"))?;
        let target_database = args
            .target_database
            .clone()
            .or_else(|| rules.target_database.clone())
            .ok_or_else(|| anyhow::anyhow!("Target database name is required"))?;

        let source = StoreTarget::new(&args.source_host, args.source_port, source_database);
        let target = StoreTarget::new(
            args.target_host.as_deref().unwrap_or(&args.source_host),
            args.target_port.unwrap_or(args.source_port),
            target_database,
        );

        let output_dir = args
            .output_dir
            .clone()
            .or_else(|| rules.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let collections = if args.collections.is_empty() {
            rules.collections.clone()
        } else {
            args.collections.clone()
        };

        let connect_timeout = duration::parse_duration(&args.connect_timeout)
            .with_context(|| format!("Invalid --connect-timeout: {}", args.connect_timeout))?;

        Ok(Self {
            source,
            target,
            output_dir,
            collections,
            clear_summary: args.clear_summary,
            connect_timeout,
            rules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CompareArgs {
        CompareArgs {
            config: None,
            source_host: "localhost".to_string(),
            source_port: 42692,
            source_database: None,
            target_host: None,
            target_port: None,
            target_database: None,
            collections: vec![],
            output_dir: None,
            clear_summary: false,
            connect_timeout: "10".to_string(),
        }
    }

    fn file_config() -> CompareConfig {
        CompareConfig::from_yaml(
            r#"
source_database: s5_snyk_libio
target_database: export_s5_snyk_libio
output_dir: out
collections: [libioVuln, mergedVuln]
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_config_file_values_used_when_cli_silent() {
        let settings = RunSettings::from_parts(&args(), file_config()).unwrap();
        assert_eq!(settings.source, StoreTarget::new("localhost", 42692, "s5_snyk_libio"));
        assert_eq!(
            settings.target,
            StoreTarget::new("localhost", 42692, "export_s5_snyk_libio")
        );
        assert_eq!(settings.output_dir, PathBuf::from("out"));
        assert_eq!(settings.collections, vec!["libioVuln", "mergedVuln"]);
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let mut cli = args();
        cli.source_database = Some("a".to_string());
        cli.target_database = Some("b".to_string());
        cli.target_host = Some("remote".to_string());
        cli.target_port = Some(27018);
        cli.collections = vec!["patchUrls".to_string()];
        cli.output_dir = Some(PathBuf::from("elsewhere"));
        cli.connect_timeout = "1m".to_string();

        let settings = RunSettings::from_parts(&cli, file_config()).unwrap();
        assert_eq!(settings.source.database, "a");
        assert_eq!(settings.target, StoreTarget::new("remote", 27018, "b"));
        assert_eq!(settings.collections, vec!["patchUrls"]);
        assert_eq!(settings.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(settings.connect_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_defaults_without_config() {
        let mut cli = args();
        cli.source_database = Some("a".to_string());
        cli.target_database = Some("b".to_string());
        let settings = RunSettings::from_parts(&cli, CompareConfig::default()).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(settings.collections.is_empty());
    }

    #[test]
    fn test_database_names_required() {
        let err = RunSettings::from_parts(&args(), CompareConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Source database"));

        let mut cli = args();
        cli.source_database = Some("a".to_string());
        let err = RunSettings::from_parts(&cli, CompareConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Target database"));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut cli = args();
        cli.source_database = Some("a".to_string());
        cli.target_database = Some("b".to_string());
        cli.connect_timeout = "soon".to_string();
        assert!(RunSettings::from_parts(&cli, CompareConfig::default()).is_err());
    }
}
