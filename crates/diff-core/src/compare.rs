//! Key-set comparison of two record sets.

use crate::comparable::{ComparableRecord, RecordDiff};
use crate::config::CollectionRules;
use crate::key::MatchKey;
use crate::Record;
use std::collections::{BTreeMap, BTreeSet};

/// Records of one side grouped by match key.
///
/// Multiplicity is preserved: a key is ambiguous on this side when it maps to
/// more than one record.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    groups: BTreeMap<MatchKey, Vec<Record>>,
    record_count: usize,
}

impl Grouping {
    pub fn build(records: Vec<Record>, match_keys: &[String]) -> Self {
        let record_count = records.len();
        let mut groups: BTreeMap<MatchKey, Vec<Record>> = BTreeMap::new();
        for record in records {
            let key = MatchKey::derive(&record, match_keys);
            groups.entry(key).or_default().push(record);
        }
        Self {
            groups,
            record_count,
        }
    }

    pub fn get(&self, key: &MatchKey) -> Option<&[Record]> {
        self.groups.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &MatchKey> {
        self.groups.keys()
    }

    pub fn is_ambiguous(&self, key: &MatchKey) -> bool {
        self.groups.get(key).is_some_and(|records| records.len() > 1)
    }

    /// Number of records on this side, duplicates included.
    pub fn record_count(&self) -> usize {
        self.record_count
    }

}

/// A key together with every record mapped to it on one side.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedRecords {
    pub key: MatchKey,
    pub records: Vec<Record>,
}

/// A common key whose first source and first target records differ.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentPair {
    pub key: MatchKey,
    pub source: Record,
    pub target: Record,
    pub diff: RecordDiff,
}

/// Outcome of comparing one collection across the two stores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionComparison {
    pub collection: String,
    pub source_total: usize,
    pub target_total: usize,
    pub only_in_source: Vec<KeyedRecords>,
    pub only_in_target: Vec<KeyedRecords>,
    pub common: Vec<MatchKey>,
    pub different: Vec<DifferentPair>,
    /// Common keys with more than one source record.
    pub ambiguous_in_source: Vec<KeyedRecords>,
    /// Common keys with more than one target record.
    pub ambiguous_in_target: Vec<KeyedRecords>,
}

/// Compare the source and target records of `collection`.
///
/// Keys present on one side only list every record mapped to them. For keys
/// present on both sides only the first record of each side is diffed; further
/// duplicates are surfaced through the ambiguous-match lists, not diffed.
pub fn compare_records(
    collection: &str,
    source_records: Vec<Record>,
    target_records: Vec<Record>,
    rules: &CollectionRules,
) -> CollectionComparison {
    let source = Grouping::build(source_records, &rules.match_keys);
    let target = Grouping::build(target_records, &rules.match_keys);

    let source_keys: BTreeSet<&MatchKey> = source.keys().collect();
    let target_keys: BTreeSet<&MatchKey> = target.keys().collect();

    let only_in_source = keyed(&source, source_keys.difference(&target_keys).copied());
    let only_in_target = keyed(&target, target_keys.difference(&source_keys).copied());
    let common: Vec<MatchKey> = source_keys
        .intersection(&target_keys)
        .map(|key| (*key).clone())
        .collect();

    let mut different = Vec::new();
    for key in &common {
        let (Some(source_first), Some(target_first)) = (
            source.get(key).and_then(<[Record]>::first),
            target.get(key).and_then(<[Record]>::first),
        ) else {
            continue;
        };
        let source_cmp = ComparableRecord::from_record(source_first, &rules.excluded);
        let target_cmp = ComparableRecord::from_record(target_first, &rules.excluded);
        if source_cmp != target_cmp {
            tracing::debug!("Records differ for key {} in {}", key, collection);
            different.push(DifferentPair {
                key: key.clone(),
                source: source_first.clone(),
                target: target_first.clone(),
                diff: source_cmp.diff(&target_cmp),
            });
        }
    }

    let ambiguous_in_source = keyed(&source, common.iter().filter(|k| source.is_ambiguous(k)));
    let ambiguous_in_target = keyed(&target, common.iter().filter(|k| target.is_ambiguous(k)));

    CollectionComparison {
        collection: collection.to_string(),
        source_total: source.record_count(),
        target_total: target.record_count(),
        only_in_source,
        only_in_target,
        common,
        different,
        ambiguous_in_source,
        ambiguous_in_target,
    }
}

fn keyed<'a>(grouping: &Grouping, keys: impl Iterator<Item = &'a MatchKey>) -> Vec<KeyedRecords> {
    keys.map(|key| KeyedRecords {
        key: key.clone(),
        records: grouping.get(key).map(<[Record]>::to_vec).unwrap_or_default(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparable::Comparable;
    use crate::key::KeyValue;
    use bson::{doc, oid::ObjectId};
    use std::collections::HashSet;

    fn id_key(id: &str) -> MatchKey {
        MatchKey::from_parts([("id", KeyValue::text(id))])
    }

    #[test]
    fn test_grouping_preserves_multiplicity() {
        let grouping = Grouping::build(
            vec![doc! { "k": 1 }, doc! { "k": 1, "v": 2 }, doc! { "k": 2 }],
            &["k".to_string()],
        );
        assert_eq!(grouping.record_count(), 3);
        assert_eq!(grouping.keys().count(), 2);
        let one = MatchKey::from_parts([("k", KeyValue::text("1"))]);
        assert!(grouping.is_ambiguous(&one));
        assert_eq!(grouping.get(&one).map(<[Record]>::len), Some(2));
    }

    #[test]
    fn test_single_field_difference() {
        let result = compare_records(
            "c",
            vec![doc! { "id": 1, "x": "a" }],
            vec![doc! { "id": 1, "x": "b" }],
            &CollectionRules::new(["id"]),
        );
        assert_eq!(result.common, vec![id_key("1")]);
        assert!(result.only_in_source.is_empty());
        assert!(result.only_in_target.is_empty());
        assert_eq!(result.different.len(), 1);
        let diff = &result.different[0].diff;
        assert_eq!(diff.changed.len(), 1);
        assert_eq!(
            diff.changed.get("x"),
            Some(&(Comparable::Text("a".into()), Comparable::Text("b".into())))
        );
    }

    #[test]
    fn test_int_and_integral_double_match_and_compare_equal() {
        let result = compare_records(
            "c",
            vec![doc! { "id": 1, "score": 7 }],
            vec![doc! { "id": 1.0, "score": 7.0 }],
            &CollectionRules::new(["id"]),
        );
        assert_eq!(result.common, vec![id_key("1")]);
        assert!(result.only_in_source.is_empty());
        assert!(result.only_in_target.is_empty());
        assert!(result.different.is_empty());
    }

    #[test]
    fn test_record_only_in_source() {
        let record = doc! { "k": 1, "v": 5 };
        let result = compare_records(
            "c",
            vec![record.clone()],
            vec![],
            &CollectionRules::new(["k"]),
        );
        assert_eq!(result.only_in_source.len(), 1);
        assert_eq!(
            result.only_in_source[0].key,
            MatchKey::from_parts([("k", KeyValue::text("1"))])
        );
        assert_eq!(result.only_in_source[0].records, vec![record]);
        assert!(result.only_in_target.is_empty());
        assert!(result.common.is_empty());
    }

    #[test]
    fn test_excluded_field_difference_is_ignored() {
        let rules = CollectionRules::new(["id"]).excluding(["body"]);
        let result = compare_records(
            "c",
            vec![doc! { "id": 1, "body": "old", "x": 1 }],
            vec![doc! { "id": 1, "body": "new", "x": 1 }],
            &rules,
        );
        assert_eq!(result.common.len(), 1);
        assert!(result.different.is_empty());
    }

    #[test]
    fn test_store_ids_never_cause_differences() {
        let result = compare_records(
            "c",
            vec![doc! { "_id": ObjectId::new(), "id": 1 }],
            vec![doc! { "_id": ObjectId::new(), "id": 1 }],
            &CollectionRules::new(["id"]),
        );
        assert!(result.different.is_empty());
    }

    #[test]
    fn test_ambiguous_unique_key_lists_every_record() {
        let result = compare_records(
            "c",
            vec![doc! { "id": 1, "n": 1 }, doc! { "id": 1, "n": 2 }],
            vec![doc! { "id": 2 }],
            &CollectionRules::new(["id"]),
        );
        assert_eq!(result.only_in_source.len(), 1);
        assert_eq!(result.only_in_source[0].records.len(), 2);
        // Ambiguity is only tracked for common keys.
        assert!(result.ambiguous_in_source.is_empty());
    }

    #[test]
    fn test_ambiguous_common_key_counted_once_per_key() {
        let result = compare_records(
            "c",
            vec![
                doc! { "id": 1, "n": 1 },
                doc! { "id": 1, "n": 2 },
                doc! { "id": 1, "n": 3 },
                doc! { "id": 2 },
            ],
            vec![doc! { "id": 1, "n": 1 }, doc! { "id": 2 }, doc! { "id": 2 }],
            &CollectionRules::new(["id"]),
        );
        assert_eq!(result.ambiguous_in_source.len(), 1);
        assert_eq!(result.ambiguous_in_source[0].key, id_key("1"));
        assert_eq!(result.ambiguous_in_source[0].records.len(), 3);
        assert_eq!(result.ambiguous_in_target.len(), 1);
        assert_eq!(result.ambiguous_in_target[0].key, id_key("2"));
        assert_eq!(result.ambiguous_in_target[0].records.len(), 2);
        // First records are equal on both keys.
        assert!(result.different.is_empty());
    }

    #[test]
    fn test_empty_match_spec_collapses_each_side() {
        let result = compare_records(
            "c",
            vec![doc! { "a": 1 }, doc! { "a": 2 }],
            vec![doc! { "b": 1 }],
            &CollectionRules::default(),
        );
        assert!(result.only_in_source.is_empty());
        assert!(result.only_in_target.is_empty());
        assert_eq!(result.common, vec![MatchKey::default()]);
        assert_eq!(result.ambiguous_in_source.len(), 1);
        assert_eq!(result.different.len(), 1);

        let one_sided = compare_records(
            "c",
            vec![doc! { "a": 1 }],
            vec![],
            &CollectionRules::default(),
        );
        assert_eq!(one_sided.only_in_source.len(), 1);
        assert!(one_sided.common.is_empty());
    }

    #[test]
    fn test_key_sets_partition_the_union() {
        let rules = CollectionRules::new(["k"]);
        let source = vec![
            doc! { "k": 1 },
            doc! { "k": 2 },
            doc! { "k": 2 },
            doc! { "k": 3 },
        ];
        let target = vec![doc! { "k": 3 }, doc! { "k": 4 }, doc! { "k": 5 }];
        let union: HashSet<MatchKey> = source
            .iter()
            .chain(target.iter())
            .map(|r| MatchKey::derive(r, &rules.match_keys))
            .collect();

        let result = compare_records("c", source, target, &rules);
        assert_eq!(
            result.only_in_source.len() + result.only_in_target.len() + result.common.len(),
            union.len()
        );
        let only_source: HashSet<&MatchKey> =
            result.only_in_source.iter().map(|k| &k.key).collect();
        let only_target: HashSet<&MatchKey> =
            result.only_in_target.iter().map(|k| &k.key).collect();
        assert_eq!(only_source.len(), 2);
        assert_eq!(only_target.len(), 2);
        assert!(only_source.is_disjoint(&only_target));
    }
}
