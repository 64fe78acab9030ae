//! Listing pagination and advisory collection.

use crate::error::HarvestError;
use crate::fetch::PageFetcher;
use crate::html::anchors;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Classes an advisory link carries on a listing page.
const ADVISORY_LINK_CLASSES: &[&str] = &["anchor", "anchor--underline", "anchor--default"];

/// Path prefix of advisory detail pages.
const ADVISORY_PATH_PREFIX: &str = "/vuln/";

/// Text of patch links on an advisory page.
const PATCH_LINK_TEXT: &str = "GitHub Commit";

/// One harvested advisory, in the shape the loader inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    #[serde(rename = "VulnID")]
    pub vuln_id: String,
    #[serde(rename = "PatchUrls")]
    pub patch_urls: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// First listing page; page N > 1 lives at `<base_url>/N`.
    pub base_url: String,
    /// Prefix turning a relative advisory href into an absolute URL.
    pub site_root: String,
    /// Stop once this many advisories have been collected.
    pub max_records: usize,
    /// Pause after each successfully harvested advisory.
    pub item_delay: Duration,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            base_url: "https://security.snyk.io/vuln/maven".to_string(),
            site_root: "https://security.snyk.io".to_string(),
            max_records: 700,
            item_delay: Duration::from_millis(100),
        }
    }
}

impl HarvestOptions {
    pub fn listing_url(&self, page: usize) -> String {
        if page > 1 {
            format!("{}/{}", self.base_url.trim_end_matches('/'), page)
        } else {
            self.base_url.clone()
        }
    }
}

/// Walks listing pages until the ceiling is hit or the listing runs dry.
pub struct Harvester<F> {
    fetcher: F,
    options: HarvestOptions,
}

impl<F: PageFetcher> Harvester<F> {
    pub fn new(fetcher: F, options: HarvestOptions) -> Self {
        Self { fetcher, options }
    }

    /// Collect advisories.
    ///
    /// Never fails: a listing page that cannot be fetched or holds no
    /// advisory links ends the walk, and an advisory page that cannot be
    /// fetched is logged and skipped. Whatever was collected is returned.
    pub async fn run(&self) -> Vec<AdvisoryRecord> {
        let mut records = Vec::new();
        let mut page = 1;

        'pages: while records.len() < self.options.max_records {
            let url = self.options.listing_url(page);
            let listing = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!("Failed to fetch the page {}: {}", url, e);
                    break;
                }
            };

            let links: Vec<String> = anchors(&listing)
                .into_iter()
                .filter(|a| a.has_classes(ADVISORY_LINK_CLASSES))
                .map(|a| a.href.unwrap_or_default())
                .collect();
            if links.is_empty() {
                tracing::error!("No advisories found on page {}", page);
                break;
            }
            tracing::info!("Page {}: {} advisory links", page, links.len());

            for href in links {
                if !href.starts_with(ADVISORY_PATH_PREFIX) {
                    continue;
                }
                let vuln_id = format!("{}{}", self.options.site_root, href);

                let detail = match self.fetcher.fetch(&vuln_id).await {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::error!("Failed to fetch details for {}: {}", vuln_id, e);
                        continue;
                    }
                };

                let patch_urls = patch_links(&detail);
                tracing::debug!("{}: {} patch links", vuln_id, patch_urls.len());
                records.push(AdvisoryRecord {
                    vuln_id,
                    patch_urls,
                });

                if records.len() >= self.options.max_records {
                    break 'pages;
                }
                if !self.options.item_delay.is_zero() {
                    tokio::time::sleep(self.options.item_delay).await;
                }
            }

            page += 1;
        }

        records
    }
}

/// Hrefs of the patch commit links on an advisory page.
pub fn patch_links(html: &str) -> Vec<String> {
    anchors(html)
        .into_iter()
        .filter(|a| a.text == PATCH_LINK_TEXT)
        .filter_map(|a| a.href)
        .collect()
}

/// Write `records` as a pretty-printed JSON array.
pub fn write_records<P: AsRef<Path>>(path: P, records: &[AdvisoryRecord]) -> Result<(), HarvestError> {
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}
