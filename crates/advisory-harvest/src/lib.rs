//! Advisory harvester.
//!
//! Walks the paginated advisory listing of a vulnerability site, follows each
//! advisory link and collects the patch commit links found on the advisory
//! page. The result is written as a JSON array that the collection loader can
//! insert as-is.
//!
//! - [`html`] - tolerant anchor extraction from raw HTML
//! - [`fetch`] - the [`PageFetcher`] seam and its HTTP implementation
//! - [`harvest`] - the pagination loop and output file

mod error;
pub mod fetch;
pub mod harvest;
pub mod html;

pub use error::HarvestError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use harvest::{write_records, AdvisoryRecord, HarvestOptions, Harvester};
