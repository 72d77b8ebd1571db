//! Outbound HTTP helper shared by every tool suite.
//!
//! Each call builds its own client, issues exactly one request with a fixed
//! timeout and fixed headers, and reports failures as a typed [`FetchError`].
//! Tools branch only on "got data" vs "did not"; the variant is there for
//! logging and for tests.

use std::path::Path;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue, SET_COOKIE};
use reqwest::{Method, Url};
use serde_json::Value;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Timeout applied when a suite does not ask for a specific one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Why an outbound request produced no data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The per-call timeout elapsed.
    #[error("request timed out")]
    Timeout,

    /// DNS, TCP, TLS or any other transport-level failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// The body could not be read or was not the expected format.
    #[error("could not decode response: {0}")]
    DecodeFailed(String),

    /// The target was not an absolute http(s) URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Writing a downloaded body to disk failed.
    #[error("I/O error: {0}")]
    Io(String),
}

impl FetchError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::UpstreamStatus(status.as_u16())
        } else if err.is_decode() || err.is_body() {
            Self::DecodeFailed(err.to_string())
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }

    fn io(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }

    /// The upstream status code, when the failure was an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UpstreamStatus(code) => Some(*code),
            _ => None,
        }
    }
}

/// HTTP helper with a fixed timeout and fixed default headers.
///
/// Cloning is cheap; no connection is kept between calls.
#[derive(Debug, Clone)]
pub struct HttpClient {
    timeout: Duration,
    headers: HeaderMap,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl HttpClient {
    /// Create a helper with the given per-call timeout and no default headers.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            headers: HeaderMap::new(),
        }
    }

    /// Add a header sent with every request. Values that are not valid
    /// header text are skipped with a warning.
    pub fn with_header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => warn!(header = %name, "Ignoring header with invalid value"),
        }
        self
    }

    /// Shorthand for `Accept: application/json`.
    pub fn accept_json(self) -> Self {
        self.with_header(ACCEPT, "application/json")
    }

    /// GET a URL and parse the body as JSON.
    pub async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.request_json(Method::GET, url, None, &[]).await
    }

    /// POST a JSON body and parse the response as JSON.
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        self.request_json(Method::POST, url, Some(body), &[]).await
    }

    /// Issue one request with optional JSON body and per-call headers.
    pub async fn request_json(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(HeaderName, String)],
    ) -> Result<Value, FetchError> {
        let response = self.send(method, url, body, headers).await?;
        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::DecodeFailed(e.to_string()))
    }

    /// Issue one request and return the status with the body text. Unlike
    /// the other helpers a non-2xx status is not an error here.
    pub async fn request_text(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(HeaderName, String)],
    ) -> Result<(u16, String), FetchError> {
        let response = self.dispatch(method, url, body, headers).await?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(FetchError::from_reqwest)?;
        Ok((status, text))
    }

    /// GET a URL and return the body as text.
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.send(Method::GET, url, None, &[]).await?;
        response.text().await.map_err(FetchError::from_reqwest)
    }

    /// GET a URL and stream the body into `path`. Returns the byte count.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64, FetchError> {
        let mut response = self.send(Method::GET, url, None, &[]).await?;
        let mut file = tokio::fs::File::create(path).await.map_err(FetchError::io)?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(FetchError::from_reqwest)? {
            file.write_all(&chunk).await.map_err(FetchError::io)?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(FetchError::io)?;

        debug!(url, bytes = written, "Download complete");
        Ok(written)
    }

    /// GET a URL and return the value of the named cookie, if the response
    /// set one. The status code is not enforced here: some upstreams set
    /// their session cookie on redirects or error pages.
    pub async fn fetch_cookie(&self, url: &str, name: &str) -> Result<Option<String>, FetchError> {
        let target = parse_url(url)?;
        let response = self
            .client()?
            .get(target)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        debug!(url, status = response.status().as_u16(), "Cookie probe answered");

        Ok(response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| cookie_value(header, name)))
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .default_headers(self.headers.clone())
            .build()
            .map_err(|e| FetchError::ConnectionFailed(e.to_string()))
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(HeaderName, String)],
    ) -> Result<reqwest::Response, FetchError> {
        let target = parse_url(url)?;
        let mut request = self.client()?.request(method, target);
        for (name, value) in headers {
            request = request.header(name.clone(), value.as_str());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(FetchError::from_reqwest)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
        headers: &[(HeaderName, String)],
    ) -> Result<reqwest::Response, FetchError> {
        let response = self.dispatch(method, url, body, headers).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UpstreamStatus(status.as_u16()));
        }
        Ok(response)
    }
}

/// Parse an absolute http(s) URL.
pub fn parse_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: unsupported scheme '{other}'"
        ))),
    }
}

/// Extract `name`'s value from a single `Set-Cookie` header.
pub fn cookie_value(header: &str, name: &str) -> Option<String> {
    let pair = header.split(';').next()?.trim();
    let (key, value) = pair.split_once('=')?;
    let value = value.trim();
    (key.trim() == name && !value.is_empty()).then(|| value.to_string())
}
