//! HTTP feed client.

use crate::atom::parse_feed;
use crate::error::{Error, Result};
use casewatch_core::monitor::FeedSource;
use casewatch_core::record::CaseRecord;
use std::time::Duration;
use tracing::debug;

/// Client for one Atom feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    feed_url: String,
    per_page: u32,
}

impl FeedClient {
    /// Creates a client with the given endpoint, page size, and request
    /// timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(feed_url: impl Into<String>, per_page: u32, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            feed_url: feed_url.into(),
            per_page,
        })
    }
}

impl FeedSource for FeedClient {
    type Error = Error;

    /// One GET with `query`, `order=-date`, and the fixed page size; no
    /// retry, no pagination.
    async fn fetch_cases(&self, query: &str) -> Result<Vec<CaseRecord>> {
        let per_page = self.per_page.to_string();
        let response = self
            .http
            .get(&self.feed_url)
            .query(&[
                ("query", query),
                ("order", "-date"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let cases = parse_feed(&body)?;
        debug!(count = cases.len(), "feed fetched");
        Ok(cases)
    }
}
