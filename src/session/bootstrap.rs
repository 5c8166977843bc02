//! Anonymous session bootstrap
//!
//! Some platforms reject listing requests that do not echo the anti-CSRF
//! token served in the page markup. The bootstrap fetches one page, reads
//! the token from a `<meta>` tag and injects it into the session's base
//! headers. It never fails the run.

use super::{Session, ACCEPT_HTML};
use crate::crawler::get_text;
use crate::extract::extract_meta_content;

/// Where to find the anti-CSRF token and where to send it
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapSpec {
    /// Page whose markup carries the token
    pub url: String,

    /// `name` of the `<meta>` tag holding the token
    pub meta_name: String,

    /// Request header the token is echoed in
    pub header_name: String,
}

/// What the bootstrap achieved
#[derive(Debug, Clone, PartialEq)]
pub enum BootstrapOutcome {
    /// Token found and injected
    TokenInjected,

    /// Page fetched but no token in it
    TokenMissing,

    /// Page could not be fetched, or the token was not a valid header value
    Failed(String),
}

/// Performs the bootstrap fetch and injects the token
///
/// # Arguments
///
/// * `session` - The session to update
/// * `spec` - Bootstrap URL, meta tag and header names
///
/// # Returns
///
/// The outcome; every outcome lets the crawl proceed.
pub async fn bootstrap_session(session: &mut Session, spec: &BootstrapSpec) -> BootstrapOutcome {
    tracing::info!("Initializing session and fetching CSRF token from {}", spec.url);

    let body = match get_text(session, &spec.url, &[("Accept", ACCEPT_HTML)]).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(
                "Session initialization failed: {}. Proceeding without {} header",
                e,
                spec.header_name
            );
            return BootstrapOutcome::Failed(e.to_string());
        }
    };

    let Some(token) = extract_meta_content(&body, &spec.meta_name) else {
        tracing::warn!(
            "Meta tag '{}' not found. Proceeding without {} header",
            spec.meta_name,
            spec.header_name
        );
        return BootstrapOutcome::TokenMissing;
    };

    if let Err(e) = session.insert_header(&spec.header_name, &token) {
        tracing::warn!("Could not use token as a header value: {}", e);
        return BootstrapOutcome::Failed(e.to_string());
    }

    let preview: String = token.chars().take(20).collect();
    tracing::info!("CSRF token obtained: {}...", preview);
    BootstrapOutcome::TokenInjected
}
