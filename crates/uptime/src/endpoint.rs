//! Endpoint descriptors and the YAML endpoint file.
//!
//! The endpoint file is a YAML sequence:
//!
//! ```yaml
//! - name: index page
//!   url: https://example.com/
//! - url: example.com/body
//!   method: POST
//!   headers:
//!     content-type: application/json
//!   body: '{"foo":"bar"}'
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use reqwest::Method;
use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use tracing::{debug, info};
use url::{ParseError, Url};

use crate::error::LoadError;

/// Scheme prepended to URLs written without one
pub const DEFAULT_SCHEME: &str = "https";

/// One HTTP endpoint to probe every cycle
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EndpointDescriptor {
    /// Free-form label, only used in diagnostics
    #[serde(default)]
    pub name: Option<String>,

    /// Target URL, possibly without a scheme until normalized
    pub url: String,

    /// HTTP method, upper-cased on load
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    #[serde(default)]
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl EndpointDescriptor {
    /// A GET descriptor with no headers or body
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: None,
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into().to_uppercase();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Prefix `https://` when the URL has no scheme.
    ///
    /// Returns whether the URL was rewritten. Once a scheme is present the
    /// call is a no-op, so running it every cycle rewrites each descriptor
    /// at most once.
    pub fn normalize_scheme(&mut self) -> bool {
        if has_scheme(&self.url) {
            return false;
        }

        let normalized = format!("{DEFAULT_SCHEME}://{}", self.url);
        debug!(from = %self.url, to = %normalized, "defaulting endpoint scheme");
        self.url = normalized;
        true
    }

    /// The network authority of the URL: `[user[:pass]@]host[:port]`.
    ///
    /// A URL the parser rejects keeps its raw text as its domain, so it
    /// still shows up in the report (as DOWN).
    pub fn domain(&self) -> String {
        extract_domain(&self.url)
    }

    /// Label for log lines: the name when there is one, else the URL
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }

    fn validate(&mut self, index: usize) -> Result<(), LoadError> {
        let invalid = |reason: String| LoadError::Invalid { index, reason };

        if self.url.trim().is_empty() {
            return Err(invalid("url must not be empty".to_string()));
        }

        self.method = self.method.to_uppercase();
        Method::from_bytes(self.method.as_bytes())
            .map_err(|_| invalid(format!("unsupported HTTP method: {}", self.method)))?;

        for (name, value) in &self.headers {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| invalid(format!("invalid header name: {name}")))?;
            HeaderValue::from_str(value)
                .map_err(|_| invalid(format!("invalid value for header {name}")))?;
        }

        Ok(())
    }
}

/// Whether `raw` starts with a scheme.
///
/// `host:port` is treated as schemeless even though a URL parser reads
/// `host` as the scheme.
fn has_scheme(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(_) => {
            let rest = raw.split_once(':').map_or("", |(_, rest)| rest);
            let looks_like_port = !rest.is_empty()
                && rest.split(AUTHORITY_END).next().is_some_and(|port| {
                    !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
                });
            !looks_like_port
        }
        Err(ParseError::RelativeUrlWithoutBase) => false,
        // Unparseable for some other reason, but a scheme separator is there.
        Err(_) => raw.contains("://"),
    }
}

/// Characters that end the authority part of a URL
const AUTHORITY_END: [char; 3] = ['/', '?', '#'];

/// Authority component (userinfo, host, port) of `raw`, exactly as written.
///
/// The URL must parse and carry a host; otherwise the raw text is the domain.
/// Case, default ports and non-ASCII hosts are kept as they appear in `raw`.
pub fn extract_domain(raw: &str) -> String {
    let has_host = Url::parse(raw).is_ok_and(|url| url.has_host());
    match raw.split_once("://") {
        Some((_, rest)) if has_host => rest.split(AUTHORITY_END).next().unwrap_or(rest).to_string(),
        _ => raw.to_string(),
    }
}

/// Load and validate the endpoint descriptors from a YAML file.
///
/// Order is preserved. Methods are upper-cased here so probes never have to.
pub fn load_endpoints(path: impl AsRef<Path>) -> Result<Vec<EndpointDescriptor>, LoadError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .map_err(|source| LoadError::Read { path: path.to_path_buf(), source })?;

    let endpoints = parse_endpoints(&raw)
        .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })?
        .unwrap_or_default();

    if endpoints.is_empty() {
        return Err(LoadError::Empty { path: path.to_path_buf() });
    }

    let endpoints = validate_endpoints(endpoints)?;
    info!(count = endpoints.len(), path = %path.display(), "loaded endpoints");
    Ok(endpoints)
}

/// An empty or null document parses to `None`
fn parse_endpoints(raw: &str) -> Result<Option<Vec<EndpointDescriptor>>, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_yaml::from_str(raw)
}

fn validate_endpoints(
    mut endpoints: Vec<EndpointDescriptor>,
) -> Result<Vec<EndpointDescriptor>, LoadError> {
    for (index, endpoint) in endpoints.iter_mut().enumerate() {
        endpoint.validate(index)?;
    }
    Ok(endpoints)
}
