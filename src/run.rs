//! Per-collection comparison driver.
//!
//! Collections are processed strictly one after another. The first store
//! failure aborts the run; nothing is retried.

use crate::output::ReportWriter;
use anyhow::Context;
use collection_diff_core::{
    compare_records, CompareConfig, ComparisonStats, RecordSource, Report, ReportLabels, Summary,
};

/// Compare one collection, write its report, append its summary block and
/// mirror that block to standard output.
pub async fn compare_collection<S: RecordSource, T: RecordSource>(
    source: &S,
    target: &T,
    collection: &str,
    config: &CompareConfig,
    writer: &ReportWriter,
) -> anyhow::Result<ComparisonStats> {
    tracing::info!(
        "Comparing {} in {} and {}",
        collection,
        source.label(),
        target.label()
    );

    let source_records = source
        .fetch_all(collection)
        .await
        .with_context(|| format!("Failed to read {}.{}", source.label(), collection))?;
    let target_records = target
        .fetch_all(collection)
        .await
        .with_context(|| format!("Failed to read {}.{}", target.label(), collection))?;

    let rules = config.rules_for(collection);
    if rules.match_keys.is_empty() {
        tracing::warn!(
            "No match keys configured for {}; every record falls into one group per side",
            collection
        );
    }

    let comparison = compare_records(collection, source_records, target_records, &rules);
    let stats = ComparisonStats::from_comparison(&comparison);
    let labels = ReportLabels::new(source.label(), target.label());

    let report = Report::new(&comparison, &stats, &labels).to_string();
    let path = writer.write_report(collection, &report)?;
    tracing::info!("Report for {} written to {:?}", collection, path);

    let summary = Summary::new(collection, &stats, &labels).to_string();
    writer.append_summary(&summary)?;
    print!("{summary}");

    Ok(stats)
}

/// Compare `collections` in order.
pub async fn compare_all<S: RecordSource, T: RecordSource>(
    source: &S,
    target: &T,
    collections: &[String],
    config: &CompareConfig,
    writer: &ReportWriter,
) -> anyhow::Result<Vec<(String, ComparisonStats)>> {
    let mut results = Vec::with_capacity(collections.len());
    for collection in collections {
        let stats = compare_collection(source, target, collection, config, writer).await?;
        results.push((collection.clone(), stats));
    }
    tracing::info!("Compared {} collections", results.len());
    Ok(results)
}

/// The collections to compare: `requested` if non-empty, otherwise every
/// collection of the source database sorted by name.
pub async fn resolve_collections<S: RecordSource>(
    source: &S,
    requested: &[String],
) -> anyhow::Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested.to_vec());
    }
    let mut names = source
        .collection_names()
        .await
        .with_context(|| format!("Failed to list collections of {}", source.label()))?;
    names.sort();
    tracing::info!(
        "No collections configured; comparing all {} collections of {}",
        names.len(),
        source.label()
    );
    Ok(names)
}
