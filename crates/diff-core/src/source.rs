//! RecordSource trait definition.
//!
//! This trait abstracts over the store a side of the comparison is read from,
//! so the comparison driver can run against MongoDB or an in-memory fixture.

use crate::Record;
use anyhow::Result;

/// Read access to the collections of one store database.
///
/// # Usage Pattern
///
/// ```ignore
/// pub async fn compare_collection<S: RecordSource, T: RecordSource>(
///     source: &S,
///     target: &T,
///     collection: &str,
/// ) -> Result<()> {
///     let source_records = source.fetch_all(collection).await?;
///     let target_records = target.fetch_all(collection).await?;
///     // ...
/// }
/// ```
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Name of this side in reports, usually the database name.
    fn label(&self) -> &str;

    /// Fetch every record currently stored in `collection`.
    ///
    /// The whole collection is loaded into memory. A missing collection
    /// yields an empty list; connection failures are returned as errors.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<Record>>;

    /// Names of the collections in this database.
    async fn collection_names(&self) -> Result<Vec<String>>;
}
