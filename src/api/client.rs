use crate::auth::Token;
use crate::types::{AppError, JobId, Result};
use crate::utils::config::ApiConfig;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!("jobboard/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// HTTP client for the job-board REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            http: build_http_client(config.timeout())?,
            base_url: config.base_url.clone(),
        })
    }

    /// Client for `base_url` with no request timeout.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_http_client(None)?,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// `{collection}{id}/` with `id` percent-encoded as a single path segment.
    pub(crate) fn item_url(&self, collection: &str, id: &JobId) -> Result<Url> {
        let segment = id.to_string();
        if matches!(segment.as_str(), "" | "." | "..") {
            return Err(AppError::InvalidInput(format!("Invalid job id: '{}'", segment)));
        }

        let mut url = Url::parse(&self.url(collection))
            .map_err(|e| AppError::Config(format!("Invalid API URL '{}': {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .push(&segment)
            .push("");
        Ok(url)
    }

    /// Request builder with a bearer header when a token is present.
    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&Token>) -> RequestBuilder {
        self.request_url(method, self.url(path), token)
    }

    pub(crate) fn request_url(
        &self,
        method: Method,
        url: impl reqwest::IntoUrl,
        token: Option<&Token>,
    ) -> RequestBuilder {
        let req = self.http.request(method, url);
        match token {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }
}

/// Send `req`, turning transport failures and non-2xx replies into errors.
pub(crate) async fn execute(req: RequestBuilder) -> Result<Response> {
    let resp = req
        .send()
        .await
        .map_err(|e| AppError::Transport(e.to_string()))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    Err(AppError::Server {
        status: status.as_u16(),
        body: parse_error_body(&text),
    })
}

pub(crate) async fn execute_json<R: DeserializeOwned>(req: RequestBuilder) -> Result<R> {
    let resp = execute(req).await?;
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| AppError::Transport(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode(e.to_string()))
}

/// Error bodies are kept verbatim: JSON when it parses, otherwise the text.
fn parse_error_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
