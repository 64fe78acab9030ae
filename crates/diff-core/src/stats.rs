//! Summary statistics of a collection comparison.

use crate::compare::CollectionComparison;

/// Counts and percentages summarizing one [`CollectionComparison`].
///
/// Percentages are in the 0..=100 range and are 0 when there are no records
/// on either side.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonStats {
    pub source_total: usize,
    pub target_total: usize,
    /// `source_total + target_total - matching`, so matched pairs count once.
    pub combined_total: usize,
    /// Keys present in the source only.
    pub unique_in_source: usize,
    /// Keys present in the target only.
    pub unique_in_target: usize,
    pub total_unique: usize,
    /// Keys present on both sides.
    pub matching: usize,
    /// Matching keys whose first records differ.
    pub different: usize,
    pub matching_percentage: f64,
    pub perfect_matching_percentage: f64,
    pub ambiguous_in_source: usize,
    pub ambiguous_in_target: usize,
}

impl ComparisonStats {
    pub fn from_comparison(comparison: &CollectionComparison) -> Self {
        let matching = comparison.common.len();
        let different = comparison.different.len();
        let unique_in_source = comparison.only_in_source.len();
        let unique_in_target = comparison.only_in_target.len();
        let combined_total =
            (comparison.source_total + comparison.target_total).saturating_sub(matching);

        Self {
            source_total: comparison.source_total,
            target_total: comparison.target_total,
            combined_total,
            unique_in_source,
            unique_in_target,
            total_unique: unique_in_source + unique_in_target,
            matching,
            different,
            matching_percentage: percentage(matching, combined_total),
            perfect_matching_percentage: percentage(
                matching.saturating_sub(different),
                combined_total,
            ),
            ambiguous_in_source: comparison.ambiguous_in_source.len(),
            ambiguous_in_target: comparison.ambiguous_in_target.len(),
        }
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_records;
    use crate::config::CollectionRules;
    use bson::doc;

    #[test]
    fn test_identical_sets_match_perfectly() {
        let records = vec![
            doc! { "id": 1, "x": "a" },
            doc! { "id": 2, "x": "b" },
            doc! { "id": 3, "x": "c" },
        ];
        let comparison =
            compare_records("c", records.clone(), records, &CollectionRules::new(["id"]));
        let stats = ComparisonStats::from_comparison(&comparison);

        assert_eq!(stats.matching, 3);
        assert_eq!(stats.combined_total, 3);
        assert_eq!(stats.different, 0);
        assert_eq!(stats.total_unique, 0);
        assert_eq!(stats.matching_percentage, 100.0);
        assert_eq!(stats.perfect_matching_percentage, 100.0);
    }

    #[test]
    fn test_one_sided_record() {
        let comparison = compare_records(
            "c",
            vec![doc! { "k": 1, "v": 5 }],
            vec![],
            &CollectionRules::new(["k"]),
        );
        let stats = ComparisonStats::from_comparison(&comparison);
        assert_eq!(stats.combined_total, 1);
        assert_eq!(stats.unique_in_source, 1);
        assert_eq!(stats.unique_in_target, 0);
        assert_eq!(stats.matching_percentage, 0.0);
        assert_eq!(stats.perfect_matching_percentage, 0.0);
    }

    #[test]
    fn test_empty_sides_do_not_divide_by_zero() {
        let comparison = compare_records("c", vec![], vec![], &CollectionRules::new(["k"]));
        let stats = ComparisonStats::from_comparison(&comparison);
        assert_eq!(stats.combined_total, 0);
        assert_eq!(stats.matching_percentage, 0.0);
        assert_eq!(stats.perfect_matching_percentage, 0.0);
    }

    #[test]
    fn test_differences_lower_perfect_percentage() {
        let comparison = compare_records(
            "c",
            vec![doc! { "id": 1, "x": "a" }, doc! { "id": 2, "x": "b" }],
            vec![doc! { "id": 1, "x": "a" }, doc! { "id": 2, "x": "z" }],
            &CollectionRules::new(["id"]),
        );
        let stats = ComparisonStats::from_comparison(&comparison);
        assert_eq!(stats.matching, 2);
        assert_eq!(stats.different, 1);
        assert_eq!(stats.combined_total, 2);
        assert_eq!(stats.matching_percentage, 100.0);
        assert_eq!(stats.perfect_matching_percentage, 50.0);
    }

    #[test]
    fn test_ambiguous_keys_keep_combined_total_non_negative() {
        // Five source records, two target records, all collapsing onto the
        // empty key: one common key, both sides ambiguous.
        let comparison = compare_records(
            "c",
            (0..5).map(|i| doc! { "n": i }).collect(),
            vec![doc! { "n": 0 }, doc! { "n": 1 }],
            &CollectionRules::default(),
        );
        let stats = ComparisonStats::from_comparison(&comparison);
        assert_eq!(stats.matching, 1);
        assert_eq!(stats.combined_total, 6);
        assert_eq!(stats.ambiguous_in_source, 1);
        assert_eq!(stats.ambiguous_in_target, 1);
        assert_eq!(stats.different, 0);
        assert!((stats.matching_percentage - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_ambiguous_duplicates_on_both_sides() {
        let comparison = compare_records(
            "c",
            vec![doc! { "k": 1 }, doc! { "k": 1 }],
            vec![doc! { "k": 1 }, doc! { "k": 1 }, doc! { "k": 2 }],
            &CollectionRules::new(["k"]),
        );
        let stats = ComparisonStats::from_comparison(&comparison);
        assert_eq!(stats.matching, 1);
        assert_eq!(stats.unique_in_target, 1);
        assert_eq!(stats.combined_total, 4);
        assert_eq!(stats.ambiguous_in_source, 1);
        assert_eq!(stats.ambiguous_in_target, 1);
        assert_eq!(stats.matching_percentage, 25.0);
    }
}
