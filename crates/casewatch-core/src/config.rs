//! Run configuration.
//!
//! One explicit configuration object, built at process start and passed
//! down; components take what they need from it instead of reading
//! process-wide state.

use std::path::PathBuf;
use std::time::Duration;

/// Atom feed of the National Archives Find Case Law service.
pub const FEED_URL: &str = "https://caselaw.nationalarchives.gov.uk/atom.xml";

/// SMTP submission host.
pub const SMTP_HOST: &str = "smtp.gmail.com";

/// SMTP submission port (STARTTLS).
pub const SMTP_PORT: u16 = 587;

/// Configuration for one monitor run.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Search query to monitor.
    pub query: String,
    /// Feed endpoint URL.
    pub feed_url: String,
    /// Page size requested from the feed.
    pub per_page: u32,
    /// HTTP request timeout.
    pub http_timeout: Duration,
    /// SMTP submission host.
    pub smtp_host: String,
    /// SMTP submission port.
    pub smtp_port: u16,
    /// Known-set snapshot file.
    pub data_file: PathBuf,
    /// New-case append log file.
    pub log_file: PathBuf,
}

impl MonitorConfig {
    /// Creates a configuration with the compiled defaults for the given
    /// query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            feed_url: FEED_URL.to_string(),
            per_page: 10,
            http_timeout: Duration::from_secs(30),
            smtp_host: SMTP_HOST.to_string(),
            smtp_port: SMTP_PORT,
            data_file: PathBuf::from("known_cases.json"),
            log_file: PathBuf::from("new_cases_log.txt"),
        }
    }

    /// Overrides the snapshot and log paths (used by tests).
    #[must_use]
    pub fn with_paths(mut self, data_file: impl Into<PathBuf>, log_file: impl Into<PathBuf>) -> Self {
        self.data_file = data_file.into();
        self.log_file = log_file.into();
        self
    }
}
