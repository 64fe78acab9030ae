//! Normalized record form used only for equality testing.
//!
//! Excluded fields and ObjectId values are stripped at every nesting level,
//! and every nested sequence is sorted by the textual form of its elements.
//! Sorting by text is an approximation of order-independent equality, not a
//! structural one: two lists whose elements render identically compare equal
//! after sorting even if they held different BSON types.

use bson::{Bson, Document};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A normalized value.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparable {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
    /// BSON types without a dedicated variant (dates, decimals, binaries, ...).
    Other(Bson),
    List(Vec<Comparable>),
    Map(BTreeMap<String, Comparable>),
}

impl Comparable {
    fn from_bson(value: &Bson, excluded: &BTreeSet<String>) -> Option<Self> {
        let comparable = match value {
            Bson::ObjectId(_) => return None,
            Bson::Null | Bson::Undefined => Comparable::Null,
            Bson::Boolean(b) => Comparable::Bool(*b),
            Bson::Int32(i) => Comparable::Int(i64::from(*i)),
            Bson::Int64(i) => Comparable::Int(*i),
            Bson::Double(d) => integral(*d).map_or(Comparable::Double(*d), Comparable::Int),
            Bson::String(s) => Comparable::Text(s.clone()),
            Bson::Document(doc) => Comparable::Map(comparable_fields(doc, excluded)),
            Bson::Array(items) => {
                let mut list: Vec<Comparable> = items
                    .iter()
                    .filter_map(|item| Comparable::from_bson(item, excluded))
                    .collect();
                list.sort_by_cached_key(|c| c.to_string());
                Comparable::List(list)
            }
            other => Comparable::Other(other.clone()),
        };
        Some(comparable)
    }
}

/// The integer a double holds exactly, if any, so `7` and `7.0` compare equal.
fn integral(d: f64) -> Option<i64> {
    // i64::MAX as f64 rounds up to 2^63, hence the exclusive bound.
    let in_range = d >= i64::MIN as f64 && d < i64::MAX as f64;
    (d.fract() == 0.0 && in_range).then_some(d as i64)
}

impl fmt::Display for Comparable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparable::Null => write!(f, "null"),
            Comparable::Bool(b) => write!(f, "{b}"),
            Comparable::Int(i) => write!(f, "{i}"),
            Comparable::Double(d) => write!(f, "{d}"),
            Comparable::Text(s) => write!(f, "{s:?}"),
            Comparable::Other(b) => write!(f, "{b}"),
            Comparable::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Comparable::Map(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name:?}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

fn comparable_fields(doc: &Document, excluded: &BTreeSet<String>) -> BTreeMap<String, Comparable> {
    doc.iter()
        .filter(|(name, _)| !excluded.contains(name.as_str()))
        .filter_map(|(name, value)| {
            Comparable::from_bson(value, excluded).map(|c| (name.clone(), c))
        })
        .collect()
}

/// A whole record in comparable form.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparableRecord(BTreeMap<String, Comparable>);

impl ComparableRecord {
    pub fn from_record(record: &Document, excluded: &BTreeSet<String>) -> Self {
        ComparableRecord(comparable_fields(record, excluded))
    }

    pub fn get(&self, field: &str) -> Option<&Comparable> {
        self.0.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Field-level difference against `other`.
    ///
    /// `changed` only covers fields present on both sides; fields present on
    /// one side only are listed separately.
    pub fn diff(&self, other: &ComparableRecord) -> RecordDiff {
        let mut diff = RecordDiff::default();
        for (name, value) in &self.0 {
            match other.0.get(name) {
                Some(other_value) if other_value != value => {
                    diff.changed
                        .insert(name.clone(), (value.clone(), other_value.clone()));
                }
                Some(_) => {}
                None => diff.only_in_source.push(name.clone()),
            }
        }
        diff.only_in_target = other
            .0
            .keys()
            .filter(|name| !self.0.contains_key(*name))
            .cloned()
            .collect();
        diff
    }
}

/// Difference between two comparable records.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordDiff {
    /// Fields on both sides with unequal values: field → (source, target).
    pub changed: BTreeMap<String, (Comparable, Comparable)>,
    pub only_in_source: Vec<String>,
    pub only_in_target: Vec<String>,
}

impl RecordDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.only_in_source.is_empty() && self.only_in_target.is_empty()
    }
}

impl fmt::Display for RecordDiff {
    /// Renders the `changed` map as `{field: (source, target), ...}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, (source, target))) in self.changed.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name:?}: ({source}, {target})")?;
        }
        write!(f, "}}")
    }
}
