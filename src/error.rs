use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrokipediaError>;

/// Failures surfaced by [`GrokipediaClient`](crate::client::GrokipediaClient).
///
/// Nothing here is retried; each variant carries enough context to render a
/// message for the caller.
#[derive(Error, Debug)]
pub enum GrokipediaError {
    /// Connection or protocol failure before a response was read.
    #[error("{context}: {source}")]
    Request {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    /// Non-success status (other than a page-lookup 404).
    #[error("API error: HTTP {status}{}", body_suffix(.body))]
    Api { status: u16, body: Option<String> },

    #[error("page not found: {slug}")]
    NotFound { slug: String },

    #[error("error parsing API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

fn body_suffix(body: &Option<String>) -> String {
    match body.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => format!(": {text}"),
        _ => String::new(),
    }
}

impl GrokipediaError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Network failure, deadline or cancellation.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Timeout(_) | Self::Cancelled
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Request { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
