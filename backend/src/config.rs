//! Configuration values for the search client and the pipeline driver.
//!
//! Nothing here is global: the CLI builds a [`SearchConfig`] and a
//! [`PipelineConfig`] and hands them to the client and the driver.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// MusicBrainz web service root.
pub const DEFAULT_BASE_URL: &str = "https://musicbrainz.org/ws/2/";

/// Identifies this tool to MusicBrainz, which rejects anonymous clients.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "areasearch/",
    env!("CARGO_PKG_VERSION"),
    " ( https://github.com/areasearch/areasearch )"
);

/// Results requested per search. Only the first page is fetched.
pub const DEFAULT_LIMIT: u32 = 10;

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default table output file.
pub const DEFAULT_TABLE_PATH: &str = "artists.csv";

/// Default tree output file.
pub const DEFAULT_TREE_PATH: &str = "artists.xml";

// =============================================================================
// Search
// =============================================================================

/// Settings for [`crate::search::MusicBrainzClient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub base_url: String,
    pub user_agent: String,
    pub limit: u32,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            limit: DEFAULT_LIMIT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `MUSICBRAINZ_URL`, `MUSICBRAINZ_USER_AGENT`
    /// and `MUSICBRAINZ_TIMEOUT_SECS`. Reads the process environment only;
    /// the binary loads `.env` once at startup.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = env::var("MUSICBRAINZ_URL") {
            config.base_url = url;
        }
        if let Ok(agent) = env::var("MUSICBRAINZ_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Some(secs) = env::var("MUSICBRAINZ_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
        {
            config.timeout_secs = secs;
        }
        config
    }

    /// Set the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// How the table exporter treats commas and quotes inside fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableQuoting {
    /// `name, id, "tag1, tag2"` with no escaping. A name or tag that contains
    /// a comma or a double quote makes the line ambiguous on read-back;
    /// consumers have to tolerate that.
    #[default]
    Verbatim,
    /// Standard CSV: comma delimiter, fields quoted when needed and embedded
    /// quotes doubled.
    Rfc4180,
}

/// Settings for [`crate::pipeline::Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub table_path: PathBuf,
    pub tree_path: PathBuf,
    #[serde(default)]
    pub quoting: TableQuoting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            tree_path: PathBuf::from(DEFAULT_TREE_PATH),
            quoting: TableQuoting::Verbatim,
        }
    }
}

impl PipelineConfig {
    pub fn new(table_path: impl Into<PathBuf>, tree_path: impl Into<PathBuf>) -> Self {
        Self {
            table_path: table_path.into(),
            tree_path: tree_path.into(),
            quoting: TableQuoting::default(),
        }
    }

    pub fn with_quoting(mut self, quoting: TableQuoting) -> Self {
        self.quoting = quoting;
        self
    }
}
