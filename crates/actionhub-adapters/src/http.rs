//! The HTTP layer every vendor action goes through.
//!
//! Adapters never talk to `reqwest` directly: they build an [`HttpRequest`]
//! and hand it to an [`HttpClient`].  Production code uses [`ReqwestClient`];
//! tests substitute a scripted client and count the calls it receives.
//!
//! [`fetch_json`] is the shared request path: it performs one GET, maps the
//! status code onto the [`ActionError`] taxonomy, and decodes the body.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{ActionConfig, Vendor};
use crate::error::{ActionError, Result};

/// Query parameters whose values must never reach the logs.
const SECRET_PARAMS: &[&str] = &["appid", "api_key", "apiKey"];

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// A single outbound GET request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Absolute URL without query string.
    pub url: String,
    /// Query parameters, in the order they are sent.
    pub query: Vec<(String, String)>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            timeout,
        }
    }

    /// Append a query parameter.
    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_owned(), value.into()));
        self
    }

    /// Value of the first query parameter called `name`.
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Query parameters with secret values masked, for logging.
    pub fn redacted_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                if SECRET_PARAMS.contains(&k.as_str()) {
                    format!("{k}=***")
                } else {
                    format!("{k}={v}")
                }
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `text` with every secret query value masked.
    pub fn scrub(&self, text: &str) -> String {
        self.query
            .iter()
            .filter(|(k, v)| SECRET_PARAMS.contains(&k.as_str()) && !v.is_empty())
            .fold(text.to_owned(), |acc, (_, v)| acc.replace(v.as_str(), "***"))
    }
}

/// Status and raw body of a completed request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Why a request produced no response at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// Minimal HTTP client interface used by all vendor actions.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    async fn get(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client that sends the configured user agent.
    pub fn new(config: &ActionConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .get(&request.url)
            .query(&request.query)
            .timeout(request.timeout)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify_reqwest_error)?;
        Ok(HttpResponse { status, body })
    }
}

/// The request URL carries the API key, so it is stripped before the error
/// is rendered.
fn classify_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connect(e.without_url().to_string())
    }
}

// ---------------------------------------------------------------------------
// Shared request path
// ---------------------------------------------------------------------------

/// Perform `request` against `vendor` and decode a JSON object body.
///
/// `subject` names what was asked for (city, title, topic) and is carried in
/// [`ActionError::NotFound`].
pub async fn fetch_json(
    client: &dyn HttpClient,
    vendor: Vendor,
    subject: &str,
    request: &HttpRequest,
) -> Result<Value> {
    debug!(
        vendor = %vendor,
        url = %request.url,
        query = %request.redacted_query(),
        "sending vendor request"
    );

    let response = client.get(request).await.map_err(|e| match e {
        TransportError::Timeout => ActionError::Timeout {
            vendor,
            seconds: whole_seconds(request.timeout),
        },
        TransportError::Connect(reason) => ActionError::Upstream {
            vendor,
            detail: request.scrub(&reason),
        },
    })?;

    debug!(vendor = %vendor, status = response.status, bytes = response.body.len(), "vendor responded");

    if !response.is_success() {
        let err = status_error(vendor, subject, &response);
        warn!(vendor = %vendor, status = response.status, error = %err, "vendor request failed");
        return Err(err);
    }

    parse_object(vendor, &response.body)
}

/// Seconds in `d`, rounded up so a sub-second timeout never reads as zero.
fn whole_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Map a non-success response onto the error taxonomy.
fn status_error(vendor: Vendor, subject: &str, response: &HttpResponse) -> ActionError {
    match response.status {
        404 => ActionError::NotFound {
            vendor,
            subject: subject.to_owned(),
        },
        429 => ActionError::RateLimited { vendor },
        status => {
            let detail = match vendor_message(&response.body) {
                Some(message) => format!("HTTP {status}: {message}"),
                None => format!("HTTP {status}"),
            };
            ActionError::Upstream { vendor, detail }
        }
    }
}

/// The human-readable message vendors put in error bodies, if any.
///
/// NewsAPI and OpenWeatherMap use `message`, TMDb uses `status_message`.
fn vendor_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("status_message"))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

fn parse_object(vendor: Vendor, body: &str) -> Result<Value> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| ActionError::MalformedResponse {
            vendor,
            reason: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(ActionError::MalformedResponse {
            vendor,
            reason: "expected a JSON object".into(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Test support
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Replays canned responses in order and records every request.
    #[derive(Default)]
    pub struct ScriptedClient {
        replies: Mutex<VecDeque<std::result::Result<HttpResponse, TransportError>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub fn fail(self, error: TransportError) -> Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn request(&self, index: usize) -> HttpRequest {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl HttpClient for ScriptedClient {
        async fn get(
            &self,
            request: &HttpRequest,
        ) -> std::result::Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| panic!("no scripted reply for {}", request.url))
        }
    }
}
