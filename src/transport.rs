//! Authenticated HTTP transport for the GitHub REST API.
//!
//! Builds the `reqwest::Client` every accessor call goes through: bearer
//! token and GitHub headers on every request, a per-request timeout, and a
//! proxy chosen per outgoing request from HTTP_PROXY / HTTPS_PROXY /
//! NO_PROXY style settings.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Proxy, Url};

use crate::constants::api;
use crate::errors::MigrateError;

/// Turn a user-supplied enterprise hostname into an API base URL.
///
/// Accepts a bare host, a URL with or without scheme, and URLs that already
/// end in `/api/v3`. Returns `None` for an empty hostname, meaning the
/// public API.
///
/// ```
/// use gh_migrate_variables::transport::normalize_hostname;
///
/// assert_eq!(
///     normalize_hostname("https://ghe.example.com/api/v3/").as_deref(),
///     Some("https://ghe.example.com/api/v3")
/// );
/// assert_eq!(normalize_hostname(""), None);
/// ```
pub fn normalize_hostname(hostname: &str) -> Option<String> {
    let host = hostname.trim();
    let host = host
        .strip_prefix("http://")
        .or_else(|| host.strip_prefix("https://"))
        .unwrap_or(host);
    let host = host.trim_end_matches('/');
    let host = host.strip_suffix(api::ENTERPRISE_API_SUFFIX).unwrap_or(host);
    let host = host.trim_end_matches('/');

    if host.is_empty() {
        return None;
    }
    Some(format!("https://{}{}", host, api::ENTERPRISE_API_SUFFIX))
}

const PROXY_SCHEMES: [&str; 2] = ["http", "https"];

/// Proxy settings applied to outgoing requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyConfig {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    /// Comma-separated hosts that bypass the proxy.
    pub no_proxy: Option<String>,
}

impl ProxyConfig {
    pub fn new(
        http_proxy: Option<String>,
        https_proxy: Option<String>,
        no_proxy: Option<String>,
    ) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }
        Self {
            http_proxy: non_empty(http_proxy),
            https_proxy: non_empty(https_proxy),
            no_proxy: non_empty(no_proxy),
        }
    }

    /// Whether any proxy URL is set.
    pub fn is_configured(&self) -> bool {
        self.http_proxy.is_some() || self.https_proxy.is_some()
    }

    /// Whether `host` (as `host` or `host:port`) is listed in NO_PROXY.
    pub fn bypasses(&self, host: &str) -> bool {
        self.no_proxy
            .as_deref()
            .is_some_and(|list| list.split(',').any(|entry| entry.trim() == host))
    }

    /// Proxy to use for a request to `url`, if any.
    pub fn select(&self, url: &Url) -> Option<&str> {
        if self.bypasses(&request_host(url)) {
            return None;
        }
        match url.scheme() {
            "https" => self.https_proxy.as_deref(),
            "http" => self.http_proxy.as_deref(),
            _ => None,
        }
    }

    /// Reject proxy URLs that cannot be parsed or do not name an
    /// `http`/`https` proxy host.
    ///
    /// `proxy.corp:3128` parses as a URL with scheme `proxy.corp`, so the
    /// scheme and host are checked explicitly.
    pub fn validate(&self) -> Result<(), MigrateError> {
        let proxies = [
            ("HTTP proxy", self.http_proxy.as_deref()),
            ("HTTPS proxy", self.https_proxy.as_deref()),
        ];
        for (kind, value) in proxies {
            let Some(raw) = value else { continue };
            let invalid = |reason: String| {
                MigrateError::config(format!("invalid {} URL '{}': {}", kind, raw, reason))
            };
            let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
            if !PROXY_SCHEMES.iter().any(|scheme| *scheme == url.scheme()) {
                return Err(invalid(format!(
                    "scheme must be one of {}",
                    PROXY_SCHEMES.join(", ")
                )));
            }
            if url.host_str().is_none_or(str::is_empty) {
                return Err(invalid("missing host".to_string()));
            }
        }
        Ok(())
    }
}

/// The request's host, with the port appended only when the URL names one.
fn request_host(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Everything needed to build an authenticated client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub token: String,
    /// Normalized enterprise API URL; `None` targets the public API.
    pub hostname: Option<String>,
    pub proxy: ProxyConfig,
    pub timeout: Duration,
}

impl TransportConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            hostname: None,
            proxy: ProxyConfig::default(),
            timeout: Duration::from_secs(api::REQUEST_TIMEOUT_SECS),
        }
    }

    /// API base URL requests are resolved against.
    pub fn base_url(&self) -> String {
        self.hostname
            .as_deref()
            .and_then(normalize_hostname)
            .unwrap_or_else(|| api::GITHUB_API_URL.to_string())
    }
}

/// Build the authenticated HTTP client. Performs no network I/O.
pub fn build_client(config: &TransportConfig) -> Result<Client, MigrateError> {
    let token = config.token.trim();
    if token.is_empty() {
        return Err(MigrateError::Auth("GitHub token is required".to_string()));
    }

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .map_err(|_| MigrateError::Auth("GitHub token contains invalid characters".to_string()))?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static(api::ACCEPT));
    headers.insert(USER_AGENT, HeaderValue::from_static(api::USER_AGENT));
    headers.insert(
        "x-github-api-version",
        HeaderValue::from_static(api::API_VERSION),
    );

    config.proxy.validate()?;
    let proxy = config.proxy.clone();

    Client::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .no_proxy()
        .proxy(Proxy::custom(move |url| {
            proxy.select(url).and_then(|target| Url::parse(target).ok())
        }))
        .build()
        .map_err(|e| MigrateError::config(format!("failed to build HTTP client: {}", e)))
}
