use serde::Deserialize;

/// Main configuration structure for Bounty-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub platform: PlatformConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which platform to harvest, plus optional endpoint overrides
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Platform identifier (e.g. "bugcrowd", "intigriti", "hackerone")
    pub kind: String,

    /// Overrides the platform's public base URL
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    /// Overrides the platform's application base URL (detail pages)
    #[serde(rename = "app-base-url", default)]
    pub app_base_url: Option<String>,

    /// Overrides the fixed number of listing pages to walk
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Delay after each item (milliseconds), profile default when absent
    #[serde(rename = "item-delay-ms", default)]
    pub item_delay_ms: Option<u64>,

    /// Delay after each listing page (milliseconds), profile default when absent
    #[serde(rename = "page-delay-ms", default)]
    pub page_delay_ms: Option<u64>,

    /// Delay after a classification confirmation fetch (milliseconds)
    #[serde(rename = "confirm-delay-ms", default)]
    pub confirm_delay_ms: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            item_delay_ms: None,
            page_delay_ms: None,
            confirm_delay_ms: None,
        }
    }
}

fn default_request_timeout() -> u64 {
    20
}

fn default_connect_timeout() -> u64 {
    10
}

/// User agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value sent with every request
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

/// Browser-like agent; the platforms serve reduced pages to unknown agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/137.0.0.0 Safari/537.36";

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the run artifact
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// Artifact file stem, defaults to the platform id
    #[serde(rename = "file-stem", default)]
    pub file_stem: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_stem: None,
        }
    }
}

fn default_output_directory() -> String {
    ".".to_string()
}
