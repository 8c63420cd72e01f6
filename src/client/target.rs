//! Target parsing (interpreter base URL).
//!
//! parse_target -> Url (http / https only)
//! Bare `host:port` inputs are taken as plain http.
//!
use std::fmt;

use thiserror::Error;
use url::Url;

/// Why a target string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("target string is empty")]
    Empty,

    #[error("invalid target URL '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported target scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("target URL has no host: {0}")]
    MissingHost(String),
}

/// Transport security of a parsed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Http,
    Https,
}

impl TargetKind {
    pub fn of(url: &Url) -> Option<Self> {
        match url.scheme() {
            "http" => Some(TargetKind::Http),
            "https" => Some(TargetKind::Https),
            _ => None,
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TargetKind::Http => "http",
            TargetKind::Https => "https",
        })
    }
}

/// Parse a `--target` / `connect` value into the interpreter base URL.
///
/// Parsing Strategy:
/// 1. Trim; reject empty input.
/// 2. Without a `scheme://` prefix, assume `http://` (`127.0.0.1:8000`).
/// 3. Accept only http / https with a host.
///
/// Examples:
/// - "http://127.0.0.1:8000"      -> http://127.0.0.1:8000/
/// - "graph.internal:5000"        -> http://graph.internal:5000/
/// - "https://cg.example/api"     -> https://cg.example/api
pub fn parse_target(raw: &str) -> Result<Url, TargetError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TargetError::Empty);
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|source| TargetError::Invalid {
        input: raw.to_string(),
        source,
    })?;

    if TargetKind::of(&url).is_none() {
        return Err(TargetError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(TargetError::MissingHost(raw.to_string()));
    }
    Ok(url)
}
