//! Report and summary files.
//!
//! Each collection gets `<dir>/<collection>_comparison.txt`, rewritten on
//! every run. `<dir>/summary.txt` is only ever appended to, unless the caller
//! clears it explicitly before a run.

use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.txt";

/// Writes comparison artifacts under one output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Use `dir`, creating it if absent.
    pub fn create(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {dir:?}"))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn report_path(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}_comparison.txt"))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    /// Write (or overwrite) the report of `collection`.
    pub fn write_report(&self, collection: &str, contents: &str) -> anyhow::Result<PathBuf> {
        let path = self.report_path(collection);
        fs::write(&path, contents).with_context(|| format!("Failed to write report {path:?}"))?;
        tracing::debug!("Wrote report {:?}", path);
        Ok(path)
    }

    /// Append one block to the summary file.
    pub fn append_summary(&self, block: &str) -> anyhow::Result<()> {
        let path = self.summary_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open summary {path:?}"))?;
        file.write_all(block.as_bytes())
            .with_context(|| format!("Failed to append to summary {path:?}"))?;
        Ok(())
    }

    /// Truncate the summary file.
    pub fn clear_summary(&self) -> anyhow::Result<()> {
        let path = self.summary_path();
        fs::File::create(&path).with_context(|| format!("Failed to clear summary {path:?}"))?;
        Ok(())
    }
}
