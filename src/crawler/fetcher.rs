//! HTTP fetcher implementation
//!
//! This module issues the run's requests through the `Session` and
//! classifies failures:
//! - `Transport` / `Timeout` for network-level failures
//! - `Status` for non-success HTTP responses
//! - `Decode` for bodies that are not the expected JSON
//!
//! No request is retried; a failure is final for the page or item that
//! issued it.

use crate::extract::ExtractionError;
use crate::session::Session;
use reqwest::Response;
use serde_json::Value;
use thiserror::Error;

/// Number of body characters quoted in decode errors
const BODY_PREVIEW_CHARS: usize = 200;

/// Failure of a single request
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// Failure of a page- or item-scoped step
///
/// Both variants are caught at the granularity that produced them and
/// downgraded to an empty page or a degraded result.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Sends a GET request and returns the body text
///
/// # Arguments
///
/// * `session` - Session providing the client and base headers
/// * `url` - The URL to fetch
/// * `overlay` - Per-request headers applied on a copy of the base headers
pub async fn get_text(
    session: &Session,
    url: &str,
    overlay: &[(&str, &str)],
) -> Result<String, FetchError> {
    tracing::debug!("GET {}", url);

    let response = session
        .client()
        .get(url)
        .headers(session.request_headers(overlay))
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    read_body(url, response).await
}

/// Sends a GET request and decodes the body as JSON
pub async fn get_json(
    session: &Session,
    url: &str,
    overlay: &[(&str, &str)],
) -> Result<Value, FetchError> {
    let body = get_text(session, url, overlay).await?;
    decode_json(url, &body)
}

/// Sends a POST request with a JSON body and decodes the JSON response
pub async fn post_json(
    session: &Session,
    url: &str,
    payload: &Value,
    overlay: &[(&str, &str)],
) -> Result<Value, FetchError> {
    tracing::debug!("POST {}", url);

    let response = session
        .client()
        .post(url)
        .headers(session.request_headers(overlay))
        .json(payload)
        .send()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))?;

    let body = read_body(url, response).await?;
    decode_json(url, &body)
}

async fn read_body(url: &str, response: Response) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| FetchError::from_reqwest(url, e))
}

/// Decodes a body as JSON, quoting the start of the body on failure
pub fn decode_json(url: &str, body: &str) -> Result<Value, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        FetchError::Decode {
            url: url.to_string(),
            message: format!("{}. Response text: {}", e, preview),
        }
    })
}
