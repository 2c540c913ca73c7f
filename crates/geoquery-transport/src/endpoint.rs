//! Resolution of where search requests are sent.
//!
//! A search can go straight to a CloudSearch search endpoint or through a
//! caller-provided proxy. One of the two has to be configured; resolving an
//! [`EndpointConfig`] with neither fails with [`TransportError::MissingEndpoint`]
//! before any request is attempted.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use tracing::debug;

use crate::error::{Result, TransportError};

pub const DEFAULT_API_VERSION: &str = "2011-02-01";

static DOMAIN_ENDPOINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"search-([a-z][a-z0-9]+)-[a-z0-9]+\.[a-z0-9\-]+\.cloudsearch\.amazonaws\.com")
        .expect("domain endpoint pattern is valid")
});

/// Raw endpoint settings as a caller supplies them.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Host name of the CloudSearch search endpoint, without scheme.
    pub search_endpoint: Option<String>,
    /// Full url of a proxy that accepts the same query string.
    pub proxy_url: Option<String>,
    /// API version segment used for direct endpoints.
    pub api_version: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_endpoint: None,
            proxy_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn direct(host: impl Into<String>) -> Self {
        Self {
            search_endpoint: Some(host.into()),
            ..Self::default()
        }
    }

    pub fn proxy(url: impl Into<String>) -> Self {
        Self {
            proxy_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Resolve the settings into an [`Endpoint`].
    ///
    /// A direct endpoint wins over a proxy when both are present. Blank
    /// values count as absent.
    pub fn resolve(&self) -> Result<Endpoint> {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };

        if let Some(host) = non_blank(&self.search_endpoint) {
            debug!(host = %host, "Resolved direct search endpoint");
            return Ok(Endpoint::Direct {
                host,
                api_version: self.api_version.clone(),
            });
        }
        if let Some(url) = non_blank(&self.proxy_url) {
            debug!(url = %url, "Resolved proxy search endpoint");
            return Ok(Endpoint::Proxy(url));
        }
        Err(TransportError::MissingEndpoint)
    }
}

/// A resolved search target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// CloudSearch search endpoint host
    Direct { host: String, api_version: String },
    /// Proxy url
    Proxy(String),
}

impl Endpoint {
    /// Base url requests are sent to, before the query string is appended.
    pub fn search_url(&self) -> String {
        match self {
            Self::Direct { host, api_version } => format!("http://{host}/{api_version}/search"),
            Self::Proxy(url) => url.clone(),
        }
    }

    /// The search domain name, derived from a direct endpoint host such as
    /// `search-movies-abc123.us-east-1.cloudsearch.amazonaws.com`.
    pub fn domain_name(&self) -> Option<&str> {
        match self {
            Self::Direct { host, .. } => DOMAIN_ENDPOINT
                .captures(host)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str()),
            Self::Proxy(_) => None,
        }
    }

    /// Build the full request url for the given query parameters.
    pub fn request_url<I, K, V>(&self, params: I) -> Result<Url>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let base = self.search_url();
        Url::parse_with_params(&base, params)
            .map_err(|e| TransportError::InvalidUrl(format!("{base}: {e}")))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_url())
    }
}
