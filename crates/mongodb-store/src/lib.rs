//! MongoDB plumbing for collection-diff.
//!
//! Provides the MongoDB [`RecordSource`](collection_diff_core::RecordSource)
//! used by the comparison driver, and the loader that replaces a collection
//! with the contents of a JSON array file.

mod connect;
mod error;
mod load;
mod source;

pub use connect::{connect, StoreTarget, DEFAULT_CONNECT_TIMEOUT};
pub use error::StoreError;
pub use load::{parse_records, read_records, replace_collection};
pub use source::MongoRecordSource;
