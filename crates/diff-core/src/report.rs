//! Text rendering of comparison results.
//!
//! [`Report`] renders the full per-collection report, record bodies included.
//! [`Summary`] renders the abbreviated block appended to the run summary and
//! mirrored to standard output. Both end sections with a separator line of
//! [`SEPARATOR_WIDTH`] `=` characters.

use crate::compare::{CollectionComparison, KeyedRecords};
use crate::stats::ComparisonStats;
use crate::Record;
use bson::Bson;
use std::fmt;

pub const SEPARATOR_WIDTH: usize = 50;

/// Names used for the two sides in rendered text, usually database names.
///
/// Equal names get a `(source)`/`(target)` suffix so every per-side line
/// still says which side it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    pub source: String,
    pub target: String,
}

impl ReportLabels {
    pub fn new(source: &str, target: &str) -> Self {
        if source == target {
            Self {
                source: format!("{source} (source)"),
                target: format!("{target} (target)"),
            }
        } else {
            Self {
                source: source.to_string(),
                target: target.to_string(),
            }
        }
    }
}

/// Full per-collection report.
pub struct Report<'a> {
    comparison: &'a CollectionComparison,
    stats: &'a ComparisonStats,
    labels: &'a ReportLabels,
}

impl<'a> Report<'a> {
    pub fn new(
        comparison: &'a CollectionComparison,
        stats: &'a ComparisonStats,
        labels: &'a ReportLabels,
    ) -> Self {
        Self {
            comparison,
            stats,
            labels,
        }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ReportLabels { source, target } = self.labels;
        let c = self.comparison;

        writeln!(f, "Comparing {} in {} and {}", c.collection, source, target)?;
        writeln!(f, "Total entries in {}: {}", source, c.source_total)?;
        writeln!(f, "Total entries in {}: {}", target, c.target_total)?;

        writeln!(f, "Entries only in {source}:")?;
        write_record_lines(f, &c.only_in_source)?;
        writeln!(f)?;
        writeln!(f, "Entries only in {target}:")?;
        write_record_lines(f, &c.only_in_target)?;

        writeln!(f)?;
        writeln!(f, "Different entries:")?;
        for pair in &c.different {
            writeln!(f, "Key: {}", pair.key)?;
            writeln!(f, "{} entry: {}", source, RecordText(&pair.source))?;
            writeln!(f, "{} entry: {}", target, RecordText(&pair.target))?;
            writeln!(f, "Diff: {}", pair.diff)?;
            if !pair.diff.only_in_source.is_empty() {
                writeln!(
                    f,
                    "Fields only in {}: {}",
                    source,
                    pair.diff.only_in_source.join(", ")
                )?;
            }
            if !pair.diff.only_in_target.is_empty() {
                writeln!(
                    f,
                    "Fields only in {}: {}",
                    target,
                    pair.diff.only_in_target.join(", ")
                )?;
            }
        }
        writeln!(f)?;
        write_separator(f)?;

        writeln!(f)?;
        writeln!(f, "Multiple matches found in {source}:")?;
        write_ambiguous(f, source, &c.ambiguous_in_source)?;
        writeln!(f)?;
        writeln!(f, "Multiple matches found in {target}:")?;
        write_ambiguous(f, target, &c.ambiguous_in_target)?;
        writeln!(f)?;
        write_separator(f)?;

        write_stats(f, self.stats, self.labels)
    }
}

/// Abbreviated summary block: counts and percentages, no record bodies.
pub struct Summary<'a> {
    collection: &'a str,
    stats: &'a ComparisonStats,
    labels: &'a ReportLabels,
}

impl<'a> Summary<'a> {
    pub fn new(collection: &'a str, stats: &'a ComparisonStats, labels: &'a ReportLabels) -> Self {
        Self {
            collection,
            stats,
            labels,
        }
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ReportLabels { source, target } = self.labels;
        writeln!(f, "Compared {} in {} and {}", self.collection, source, target)?;
        writeln!(f, "Total entries in {}: {}", source, self.stats.source_total)?;
        writeln!(f, "Total entries in {}: {}", target, self.stats.target_total)?;
        write_stats(f, self.stats, self.labels)?;
        write_separator(f)
    }
}

fn write_stats(
    f: &mut fmt::Formatter<'_>,
    stats: &ComparisonStats,
    labels: &ReportLabels,
) -> fmt::Result {
    writeln!(f, "Combined total entries: {}", stats.combined_total)?;
    writeln!(f, "Unique entries in {}: {}", labels.source, stats.unique_in_source)?;
    writeln!(f, "Unique entries in {}: {}", labels.target, stats.unique_in_target)?;
    writeln!(f, "Total unique entries: {}", stats.total_unique)?;
    writeln!(f, "Matching entries: {}", stats.matching)?;
    writeln!(
        f,
        "Matching entries with different comparisons: {}",
        stats.different
    )?;
    writeln!(
        f,
        "Percentage of matching entries: {:.2}%",
        stats.matching_percentage
    )?;
    writeln!(
        f,
        "Percentage of perfectly matching entries: {:.2}%",
        stats.perfect_matching_percentage
    )?;
    writeln!(f, "Multiple matches in {}: {}", labels.source, stats.ambiguous_in_source)?;
    writeln!(f, "Multiple matches in {}: {}", labels.target, stats.ambiguous_in_target)
}

fn write_separator(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "{}", "=".repeat(SEPARATOR_WIDTH))
}

fn write_record_lines(f: &mut fmt::Formatter<'_>, groups: &[KeyedRecords]) -> fmt::Result {
    for group in groups {
        for record in &group.records {
            writeln!(f, "{}", RecordText(record))?;
        }
    }
    Ok(())
}

fn write_ambiguous(f: &mut fmt::Formatter<'_>, label: &str, groups: &[KeyedRecords]) -> fmt::Result {
    for group in groups {
        writeln!(f, "Key: {}", group.key)?;
        writeln!(f, "{label} entries:")?;
        for record in &group.records {
            writeln!(f, "  {}", RecordText(record))?;
        }
    }
    Ok(())
}

/// Relaxed extended JSON rendering of a record.
struct RecordText<'a>(&'a Record);

impl fmt::Display for RecordText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = Bson::Document(self.0.clone()).into_relaxed_extjson();
        write!(f, "{json}")
    }
}
