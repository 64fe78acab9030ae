//! Replace a collection with the records of a JSON array file.
//!
//! The replace is two separate steps, a drop followed by a bulk insert. There
//! is no transaction around them: a failure after the drop leaves the
//! collection empty.

use crate::error::StoreError;
use bson::Document;
use mongodb::Database;
use serde_json::Value;
use std::path::Path;

/// Parse a JSON array of objects into BSON documents.
///
/// Nothing is returned unless every element converts.
pub fn parse_records(json: &str) -> Result<Vec<Document>, StoreError> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(StoreError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(StoreError::NotAnObject { index });
            }
            bson::to_document(item).map_err(|source| StoreError::Bson { index, source })
        })
        .collect()
}

/// Read and parse a records file.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<Document>, StoreError> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content)
}

/// Drop `collection` and insert `records` in its place.
///
/// Returns the number of inserted documents.
pub async fn replace_collection(
    database: &Database,
    collection: &str,
    records: Vec<Document>,
) -> Result<u64, StoreError> {
    let handle = database.collection::<Document>(collection);

    tracing::info!("Dropping collection {}.{}", database.name(), collection);
    handle.drop().await?;

    if records.is_empty() {
        tracing::info!("No records to insert into {}", collection);
        return Ok(0);
    }

    let result = handle.insert_many(records).await?;
    let inserted = result.inserted_ids.len() as u64;
    tracing::info!(
        "Inserted {} documents into {}.{}",
        inserted,
        database.name(),
        collection
    );
    Ok(inserted)
}
