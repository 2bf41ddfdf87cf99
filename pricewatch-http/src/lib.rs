//! Minimal HTML fetch client with safe logging.
//!
//! - Per-request timeout override
//! - Bodies decoded with the `Content-Type` charset (UTF-8 when absent);
//!   undecodable bytes become U+FFFD instead of failing the request
//! - One attempt per call; failures surface as [`HttpError`]
//! - Optional *raw* request/response logging via `PRICEWATCH_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```no_run
//! # async fn demo() -> Result<(), pricewatch_http::HttpError> {
//! let client = pricewatch_http::HttpClient::new(None)?;
//! let url = url::Url::parse("https://www.lg.com/us/tvs/oled55c3").unwrap();
//! let html = client
//!     .get_text(&url, pricewatch_http::RequestOpts::default())
//!     .await?;
//! # let _ = html;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response headers, body snippets (truncated), final errors, and (optionally)
//! raw request/response lines (target `http.raw`) when `PRICEWATCH_HTTP_RAW=1`.

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use std::env;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use url::Url;

// ==============================
// Raw logging toggles
// ==============================

const RAW_ENV: &str = "PRICEWATCH_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

static REQUEST_SEQ: AtomicU64 = AtomicU64::new(1);

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, val) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, val.replace('\'', r"'\''")));
    }
    parts.push(format!("'{}'", url.as_str()));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if key.eq_ignore_ascii_case("authorization")
                || key.eq_ignore_ascii_case("cookie")
            {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {body_snippet}")]
    Status {
        status: StatusCode,
        body_snippet: String,
    },
}

// ==============================
// Request Options
// ==============================

/// Per-request tuning knobs.
///
/// ```
/// use pricewatch_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     ..Default::default()
/// };
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestOpts {
    /// Overrides the client-wide timeout for this call.
    pub timeout: Option<Duration>,
}

// ==============================
// Client
// ==============================

#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: Client,
    /// `None` waits for the remote indefinitely.
    pub default_timeout: Option<Duration>,
}

impl HttpClient {
    /// Build a client, optionally sending a fixed `User-Agent`.
    ///
    /// ```no_run
    /// use pricewatch_http::{HttpClient, HttpError};
    ///
    /// let client = HttpClient::new(Some("pricewatch/0.1"))?;
    /// assert!(client.default_timeout.is_none());
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(user_agent: Option<&str>) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        if let Some(ua) = user_agent {
            let value = HeaderValue::from_str(ua)
                .map_err(|e| HttpError::Build(format!("invalid user agent: {e}")))?;
            headers.insert(USER_AGENT, value);
        }
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            inner,
            default_timeout: None,
        })
    }

    /// Apply a timeout to every request that doesn't set its own.
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = Some(dur);
        self
    }

    /// GET `url` and return the decoded body.
    ///
    /// Non-2xx responses become [`HttpError::Status`].
    pub async fn get_text(&self, url: &Url, opts: RequestOpts) -> Result<String, HttpError> {
        self.request_internal(Method::GET, url, opts).await
    }

    async fn request_internal(
        &self,
        method: Method,
        url: &Url,
        opts: RequestOpts,
    ) -> Result<String, HttpError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(HttpError::Url(format!("unsupported scheme: {}", url.scheme())));
        }

        let mut rb = self.inner.request(method.clone(), url.clone());

        let timeout = opts.timeout.or(self.default_timeout);
        if let Some(t) = timeout {
            rb = rb.timeout(t);
        }

        let req = rb.build().map_err(|e| HttpError::Build(e.to_string()))?;
        let req_id = format!("r{:x}", REQUEST_SEQ.fetch_add(1, Ordering::Relaxed));

        tracing::debug!(
            req_id=%req_id,
            method=%method,
            host_path=%format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            timeout_ms=?timeout.map(|t| t.as_millis() as u64),
            "http.request.start"
        );

        if raw_enabled() {
            let curl = make_curl(&method, url, req.headers());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        // ----- Send -----
        let t0 = std::time::Instant::now();
        let resp = self.inner.execute(req).await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.send");
            HttpError::Network(message)
        })?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.text().await.map_err(|err| {
            let message = err.to_string();
            tracing::warn!(req_id=%req_id, message=%message, "http.network_error.body");
            HttpError::Network(message)
        })?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            req_id=%req_id,
            %status,
            duration_ms=dur_ms,
            body_len=body.len(),
            content_type=?headers.get(reqwest::header::CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            "http.response.headers"
        );

        if raw_enabled() {
            let hdrs = redact_headers(&headers);
            let truncated = body.len() > RAW_MAX_BODY;
            let text = truncate_at_boundary(&body, RAW_MAX_BODY);
            tracing::info!(
                target: "http.raw",
                %req_id,
                status=%status,
                duration_ms=dur_ms,
                headers=?hdrs,
                body=%text,
                truncated
            );
        }

        let snippet = snip_body(&body);
        tracing::trace!(req_id=%req_id, body_snippet=%snippet, "http.response.body_snippet");

        if status.is_success() {
            return Ok(body);
        }

        tracing::warn!(req_id=%req_id, %status, body_snippet=%snippet, "http.error");
        Err(HttpError::Status {
            status,
            body_snippet: snippet,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn truncate_at_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

fn snip_body(body: &str) -> String {
    let mut snip = truncate_at_boundary(body, SNIPPET_MAX).to_string();
    if snip.len() < body.len() {
        snip.push_str("...");
    }
    snip
}
