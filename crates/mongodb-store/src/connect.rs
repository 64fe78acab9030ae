//! MongoDB connection setup.

use crate::error::StoreError;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};
use std::time::Duration;

/// Connect and server selection timeout used when none is given.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Location of one store database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
}

impl StoreTarget {
    pub fn new(host: impl Into<String>, port: u16, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            database: database.into(),
        }
    }

    /// Connection string for the target's server.
    pub fn uri(&self) -> String {
        format!("mongodb://{}:{}", self.host, self.port)
    }
}

/// Open a handle to `target`'s database and verify the server answers.
pub async fn connect(target: &StoreTarget, timeout: Duration) -> Result<Database, StoreError> {
    let uri = target.uri();
    tracing::debug!("Parsing MongoDB connection options from URI: {}", uri);
    let mut options = ClientOptions::parse(&uri).await?;
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    let client = Client::with_options(options)?;
    let database = client.database(&target.database);
    database.run_command(doc! { "ping": 1 }).await?;
    tracing::info!("Connected to MongoDB at {} (database {})", uri, target.database);
    Ok(database)
}
