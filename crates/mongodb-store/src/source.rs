//! MongoDB implementation of [`RecordSource`].

use collection_diff_core::{Record, RecordSource};
use futures::TryStreamExt;
use mongodb::{bson::doc, Database};

/// Reads whole collections from one MongoDB database.
#[derive(Clone, Debug)]
pub struct MongoRecordSource {
    database: Database,
}

impl MongoRecordSource {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait::async_trait]
impl RecordSource for MongoRecordSource {
    fn label(&self) -> &str {
        self.database.name()
    }

    async fn fetch_all(&self, collection: &str) -> anyhow::Result<Vec<Record>> {
        tracing::debug!(
            "Fetching all documents from {}.{}",
            self.database.name(),
            collection
        );
        let cursor = self
            .database
            .collection::<Record>(collection)
            .find(doc! {})
            .await?;
        let records: Vec<Record> = cursor.try_collect().await?;
        tracing::info!(
            "Fetched {} documents from {}.{}",
            records.len(),
            self.database.name(),
            collection
        );
        Ok(records)
    }

    async fn collection_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.database.list_collection_names().await?)
    }
}
