//! Session handling
//!
//! A `Session` owns the cookie-bearing HTTP client and the base header set
//! shared by every request of a run. Per-request headers (Referer, Accept)
//! are overlaid on a copy of the base set, never written back into it.

mod bootstrap;

pub use bootstrap::{bootstrap_session, BootstrapOutcome, BootstrapSpec};

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::HarvestError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use std::time::Duration;

/// Accept header for HTML page requests
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
image/avif,image/webp,image/apng,*/*;q=0.8";

/// Accept header for XHR-style JSON requests
pub const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";

/// Transport handle plus the mutable base headers of one run
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_headers: HeaderMap,
}

impl Session {
    /// Creates a session with a fresh cookie store
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User agent configuration
    /// * `crawler` - Timeout configuration
    /// * `headers` - Static headers sent with every request
    pub fn new(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
        headers: &[(String, String)],
    ) -> Result<Self, HarvestError> {
        let client = build_http_client(user_agent, crawler)?;

        let mut session = Self {
            client,
            base_headers: HeaderMap::new(),
        };
        for (name, value) in headers {
            session.insert_header(name, value)?;
        }

        Ok(session)
    }

    /// Returns the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Returns the base headers shared by all requests
    pub fn base_headers(&self) -> &HeaderMap {
        &self.base_headers
    }

    /// Adds or replaces a header in the base set
    ///
    /// Header names are case-insensitive; inserting `X-CSRF-Token` replaces
    /// a previous `x-csrf-token`.
    pub fn insert_header(&mut self, name: &str, value: &str) -> Result<(), HarvestError> {
        let (name, value) = parse_header(name, value)?;
        self.base_headers.insert(name, value);
        Ok(())
    }

    /// Builds the header set for one request: a copy of the base headers
    /// with `overlay` applied on top
    ///
    /// Invalid overlay entries are skipped with a warning.
    pub fn request_headers(&self, overlay: &[(&str, &str)]) -> HeaderMap {
        let mut headers = self.base_headers.clone();
        for (name, value) in overlay {
            match parse_header(name, value) {
                Ok((name, value)) => {
                    headers.insert(name, value);
                }
                Err(e) => tracing::warn!("Skipping header overlay: {}", e),
            }
        }
        headers
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client keeps cookies across requests so that tokens bound to the
/// bootstrap response stay valid for the rest of the run.
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - The crawler configuration (timeouts)
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.value.as_str())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), HarvestError> {
    let header_name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|e| HarvestError::InvalidHeader {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    let header_value = HeaderValue::from_str(value).map_err(|e| HarvestError::InvalidHeader {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    Ok((header_name, header_value))
}
