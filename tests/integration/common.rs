//! Shared helpers for the integration tests

use bounty_harvest::config::{Config, CrawlerConfig, OutputConfig, PlatformConfig, UserAgentConfig};
use bounty_harvest::crawler::{run_crawl, RunReport};
use bounty_harvest::output::JsonFileSink;
use bounty_harvest::{PlatformProfile, ProgramResult};
use std::path::Path;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Creates a configuration pointing `kind` at a mock server, without pacing
pub fn create_test_config(kind: &str, base_url: &str, max_pages: u32, output: &Path) -> Config {
    Config {
        platform: PlatformConfig {
            kind: kind.to_string(),
            base_url: Some(base_url.to_string()),
            app_base_url: None,
            max_pages: Some(max_pages),
        },
        crawler: CrawlerConfig {
            request_timeout_secs: 5,
            connect_timeout_secs: 2,
            item_delay_ms: Some(0),
            page_delay_ms: Some(0),
            confirm_delay_ms: Some(0),
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig {
            directory: output.to_string_lossy().into_owned(),
            file_stem: None,
        },
    }
}

/// A finished run plus the sink it wrote through
pub struct Harvest {
    pub report: RunReport,
    pub sink: JsonFileSink,
}

/// Runs a whole crawl of `kind` against `base_url`
pub async fn harvest(
    kind: &str,
    base_url: &str,
    max_pages: u32,
    output: &TempDir,
    cancel: CancellationToken,
) -> Harvest {
    let config = create_test_config(kind, base_url, max_pages, output.path());
    let profile = PlatformProfile::from_config(&config).expect("Failed to resolve profile");
    let sink = JsonFileSink::new(output.path(), profile.kind.id());

    let report = run_crawl(&config, &profile, &sink, cancel)
        .await
        .expect("Crawl failed");

    Harvest { report, sink }
}

/// Reads an artifact written by the JSON sink
pub fn read_results(path: &Path) -> Vec<ProgramResult> {
    let content = std::fs::read_to_string(path).expect("Failed to read artifact");
    serde_json::from_str(&content).expect("Artifact is not a result array")
}
