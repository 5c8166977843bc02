//! Platform profiles
//!
//! A profile bundles everything platform-specific the core consumes: base
//! URLs, the optional session bootstrap, the listing endpoint and its item
//! mapping, the detail strategy, the classification rule, static headers
//! and pacing. The core never branches on the platform itself.

mod bugcrowd;
mod hackerone;
mod intigriti;
mod yeswehack;

use crate::config::Config;
use crate::crawler::detail::{ClassificationRule, DetailStrategy};
use crate::crawler::listing::{ItemMapping, ListingSpec};
use crate::crawler::Pacing;
use crate::session::BootstrapSpec;
use crate::ConfigError;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Supported platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformKind {
    Bugcrowd,

    /// Listing plus per-program tier tables
    Intigriti,

    /// Listing overview only, with confirmation fetches for ambiguous programs
    IntigritiOverview,

    HackerOne,
    YesWeHack,
}

impl PlatformKind {
    /// Returns all supported platforms
    pub fn all() -> [Self; 5] {
        [
            Self::Bugcrowd,
            Self::Intigriti,
            Self::IntigritiOverview,
            Self::HackerOne,
            Self::YesWeHack,
        ]
    }

    /// Identifier used in configuration and artifact names
    pub fn id(&self) -> &'static str {
        match self {
            Self::Bugcrowd => "bugcrowd",
            Self::Intigriti => "intigriti",
            Self::IntigritiOverview => "intigriti-overview",
            Self::HackerOne => "hackerone",
            Self::YesWeHack => "yeswehack",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Bugcrowd => "Bugcrowd",
            Self::Intigriti | Self::IntigritiOverview => "Intigriti",
            Self::HackerOne => "HackerOne",
            Self::YesWeHack => "YesWeHack",
        }
    }

    /// Public site URL
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Bugcrowd => "https://bugcrowd.com",
            Self::Intigriti | Self::IntigritiOverview => "https://www.intigriti.com",
            Self::HackerOne => "https://hackerone.com",
            Self::YesWeHack => "https://yeswehack.com",
        }
    }

    /// Application URL serving detail pages, when it differs from the base
    pub fn default_app_base_url(&self) -> Option<&'static str> {
        match self {
            Self::Intigriti | Self::IntigritiOverview => Some("https://app.intigriti.com"),
            _ => None,
        }
    }
}

impl FromStr for PlatformKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .into_iter()
            .find(|kind| kind.id() == wanted)
            .ok_or_else(|| ConfigError::UnknownPlatform(s.to_string()))
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Everything the core needs to crawl one platform
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformProfile {
    pub kind: PlatformKind,
    pub display_name: String,
    pub base_url: Url,
    pub app_base_url: Url,
    pub bootstrap: Option<BootstrapSpec>,

    /// Static headers sent with every request
    pub headers: Vec<(String, String)>,

    pub listing: ListingSpec,
    pub items: ItemMapping,
    pub detail: DetailStrategy,
    pub classification: Option<ClassificationRule>,
    pub pacing: Pacing,
}

impl PlatformProfile {
    /// Builds the built-in profile of `kind` against the given URLs
    pub fn builtin(kind: PlatformKind, base_url: Url, app_base_url: Url) -> Self {
        let urls = Urls::new(&base_url, &app_base_url);

        let parts = match kind {
            PlatformKind::Bugcrowd => bugcrowd::profile(&urls),
            PlatformKind::Intigriti => intigriti::tier_table_profile(&urls),
            PlatformKind::IntigritiOverview => intigriti::overview_profile(&urls),
            PlatformKind::HackerOne => hackerone::profile(&urls),
            PlatformKind::YesWeHack => yeswehack::profile(&urls),
        };

        Self {
            kind,
            display_name: kind.display_name().to_string(),
            base_url,
            app_base_url,
            bootstrap: parts.bootstrap,
            headers: parts.headers,
            listing: parts.listing,
            items: parts.items,
            detail: parts.detail,
            classification: parts.classification,
            pacing: parts.pacing,
        }
    }

    /// Resolves the profile selected by a configuration
    ///
    /// Applies the configured URL, page count and pacing overrides on top
    /// of the built-in profile.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let kind: PlatformKind = config.platform.kind.parse()?;

        let base_url = parse_url(
            config
                .platform
                .base_url
                .as_deref()
                .unwrap_or(kind.default_base_url()),
        )?;
        let app_base_url = match (
            config.platform.app_base_url.as_deref(),
            config.platform.base_url.as_deref(),
            kind.default_app_base_url(),
        ) {
            (Some(app), _, _) => parse_url(app)?,
            (None, Some(_), _) | (None, None, None) => base_url.clone(),
            (None, None, Some(default_app)) => parse_url(default_app)?,
        };

        let mut profile = Self::builtin(kind, base_url, app_base_url);
        if let Some(max_pages) = config.platform.max_pages {
            profile.listing.max_pages = max_pages;
        }
        profile.pacing = profile.pacing.with_overrides(&config.crawler);

        Ok(profile)
    }

    /// Human-readable description of the resolved profile
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("Platform:      {} ({})", self.display_name, self.kind),
            format!("Base URL:      {}", self.base_url),
            format!("App base URL:  {}", self.app_base_url),
            format!(
                "Bootstrap:     {}",
                self.bootstrap
                    .as_ref()
                    .map(|b| format!("{} (meta {} -> {})", b.url, b.meta_name, b.header_name))
                    .unwrap_or_else(|| "none".to_string())
            ),
            format!("Listing:       {}", self.listing.url_for_page(1)),
        ];
        if self.listing.max_pages > 1 {
            lines.push(format!("               {}", self.listing.url_for_page(2)));
        }
        lines.extend([
            format!("Pages:         {}", self.listing.max_pages),
            format!("Detail:        {}", self.detail.name()),
            format!(
                "Classification: {}",
                if self.classification.is_some() {
                    "disclosure-only check"
                } else {
                    "none"
                }
            ),
            format!(
                "Pacing:        item {:?}, page {:?} (empty {:?}), confirm {:?}",
                self.pacing.item_delay,
                self.pacing.page_delay,
                self.pacing.empty_page_delay,
                self.pacing.confirm_delay
            ),
        ]);
        lines.join("\n")
    }
}

/// Platform-specific parts of a profile
struct ProfileParts {
    bootstrap: Option<BootstrapSpec>,
    headers: Vec<(String, String)>,
    listing: ListingSpec,
    items: ItemMapping,
    detail: DetailStrategy,
    classification: Option<ClassificationRule>,
    pacing: Pacing,
}

/// Base URLs without trailing slash, for building endpoint strings
struct Urls {
    base: String,
    app: String,
}

impl Urls {
    fn new(base_url: &Url, app_base_url: &Url) -> Self {
        Self {
            base: base_url.as_str().trim_end_matches('/').to_string(),
            app: app_base_url.as_str().trim_end_matches('/').to_string(),
        }
    }
}

fn parse_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", raw, e)))
}

fn header(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}
