use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://grokipedia.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        base_url: get_env_or_default("GROKIPEDIA_BASE_URL", DEFAULT_BASE_URL),
        timeout_secs: parse_timeout_secs(env::var("GROKIPEDIA_TIMEOUT_SECS").ok().as_deref()),
    }
});

/// Process-wide settings read from the environment.
pub struct Config {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..ClientConfig::default()
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT.as_secs())
}

/// Settings a [`GrokipediaClient`](crate::client::GrokipediaClient) is built from.
///
/// The timeout bounds each call as a whole (connect, headers and body) and
/// is fixed for the lifetime of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("grokipedia-mcp/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Optional paging for a full-text search.
///
/// Absent or non-positive `limit` resolves to 10, absent or negative
/// `offset` resolves to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchConfig {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchConfig {
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Effective `(limit, offset)` sent to the server.
    pub fn resolve(&self) -> (u32, u32) {
        let limit = match self.limit {
            Some(l) if l > 0 => u32::try_from(l).unwrap_or(u32::MAX),
            _ => DEFAULT_SEARCH_LIMIT,
        };
        let offset = match self.offset {
            Some(o) if o > 0 => u32::try_from(o).unwrap_or(u32::MAX),
            _ => 0,
        };
        (limit, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    pub include_content: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            include_content: true,
        }
    }
}

impl PageConfig {
    /// Ask the server to leave the page body out of the response.
    pub fn without_content() -> Self {
        Self {
            include_content: false,
        }
    }
}
