//! Match key derivation.
//!
//! A [`MatchKey`] is a record projected onto the configured match fields and
//! canonicalized so that two records describing the same logical entity hash
//! the same way regardless of field order or list element order.

use bson::{Bson, Document};
use std::fmt;

/// One canonicalized value inside a [`MatchKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    /// Any scalar, normalized to its textual form.
    Text(String),
    /// A sequence, elements canonicalized and then sorted.
    List(Vec<KeyValue>),
    /// A nested document projected onto the same match fields.
    Map(Vec<(String, KeyValue)>),
}

impl KeyValue {
    /// Shorthand for a textual scalar.
    pub fn text(value: impl Into<String>) -> Self {
        KeyValue::Text(value.into())
    }

    fn from_bson(value: &Bson, fields: &[String]) -> Option<Self> {
        match value {
            Bson::ObjectId(_) => None,
            Bson::Document(doc) => Some(KeyValue::Map(project(doc, fields))),
            Bson::Array(items) => {
                let mut list: Vec<KeyValue> = items
                    .iter()
                    .filter_map(|item| KeyValue::from_bson(item, fields))
                    .collect();
                list.sort();
                Some(KeyValue::List(list))
            }
            other => Some(KeyValue::Text(scalar_text(other))),
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Text(s) => write!(f, "{s}"),
            KeyValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            KeyValue::Map(parts) => {
                write!(f, "{{")?;
                write_parts(f, parts)?;
                write!(f, "}}")
            }
        }
    }
}

/// The canonical identity of a record within one collection comparison.
///
/// Two records with equal keys are "matched". A record that lacks a match
/// field simply contributes no entry for it, so an empty match field list
/// gives every record the same (empty) key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(Vec<(String, KeyValue)>);

impl MatchKey {
    /// Derive the key of `record` for the given match fields.
    ///
    /// Fields are taken in `fields` order, not document order. ObjectId values
    /// are dropped wherever they occur.
    pub fn derive(record: &Document, fields: &[String]) -> Self {
        MatchKey(project(record, fields))
    }

    /// Build a key from already-canonicalized parts.
    pub fn from_parts<K: Into<String>>(parts: impl IntoIterator<Item = (K, KeyValue)>) -> Self {
        MatchKey(parts.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn parts(&self) -> &[(String, KeyValue)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        write_parts(f, &self.0)?;
        write!(f, ")")
    }
}

fn write_parts(f: &mut fmt::Formatter<'_>, parts: &[(String, KeyValue)]) -> fmt::Result {
    for (i, (name, value)) in parts.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{name}={value}")?;
    }
    Ok(())
}

fn project(doc: &Document, fields: &[String]) -> Vec<(String, KeyValue)> {
    fields
        .iter()
        .filter_map(|field| {
            let value = doc.get(field)?;
            KeyValue::from_bson(value, fields).map(|kv| (field.clone(), kv))
        })
        .collect()
}

/// Textual form of a scalar BSON value.
///
/// Strings are taken verbatim; numbers, booleans and null use their plain
/// rendering; everything else falls back to the BSON display form.
pub fn scalar_text(value: &Bson) -> String {
    match value {
        Bson::String(s) | Bson::Symbol(s) => s.clone(),
        Bson::Null | Bson::Undefined => "null".to_string(),
        Bson::Boolean(b) => b.to_string(),
        Bson::Int32(i) => i.to_string(),
        Bson::Int64(i) => i.to_string(),
        Bson::Double(d) => d.to_string(),
        other => other.to_string(),
    }
}
