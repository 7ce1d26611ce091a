use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};
use std::env;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

use crate::completion::build_request;
use crate::error::{Error, Result};
use crate::observability::{
    COMPLETION_CONNECTIVITY_ERRORS, COMPLETION_DURATION, COMPLETION_REQUESTS,
    COMPLETION_UPSTREAM_ERRORS,
};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse, Message, Model, Region};

/// Default OpenRouter API root. Paths are joined onto it.
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/";

/// Environment variable consulted when no key is supplied.
pub const API_KEY_ENV: &str = "TEMAN_WISATA_API_KEY";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for an OpenRouter-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
}

impl OpenRouter {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the
    /// `TEMAN_WISATA_API_KEY` environment variable. A missing key is not an
    /// error here; [`Self::complete`] rejects it before making any request.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| env::var(API_KEY_ENV).ok())
            .map(|key| key.trim().to_string())
            .unwrap_or_default();

        let base_url = parse_base_url(base_url.unwrap_or(DEFAULT_API_URL))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
        })
    }

    /// Returns true if the client has a non-empty API key.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Replaces the API key used for subsequent requests.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = api_key.into().trim().to_string();
    }

    /// Returns the API root requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(|_| {
            Error::validation(
                "API key contains characters not allowed in a header",
                Some("api_key".to_string()),
            )
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Send a prepared request, returning the status and raw body of a
    /// successful response.
    ///
    /// Non-success statuses become [`Error::Upstream`] carrying the raw body.
    async fn send_raw(&self, request: &ChatCompletionRequest) -> Result<(u16, String)> {
        if !self.has_api_key() {
            return Err(Error::precondition("an OpenRouter API key is required"));
        }
        let url = self.base_url.join("chat/completions")?;
        let headers = self.default_headers()?;

        COMPLETION_REQUESTS.click();
        let started = Instant::now();
        let result = self.post(url, headers, request).await;
        COMPLETION_DURATION.add(started.elapsed().as_secs_f64());

        match &result {
            Err(err) if err.is_upstream() => COMPLETION_UPSTREAM_ERRORS.click(),
            Err(err) if err.is_connectivity() => COMPLETION_CONNECTIVITY_ERRORS.click(),
            _ => {}
        }
        result
    }

    async fn post(
        &self,
        url: Url,
        headers: HeaderMap,
        request: &ChatCompletionRequest,
    ) -> Result<(u16, String)> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending completion request"
        );
        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "completion request rejected");
            return Err(Error::upstream(status.as_u16(), body));
        }
        Ok((status.as_u16(), body))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("{}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Ask the assistant to answer `new_user_text` in the context of `history`.
    ///
    /// Only the last six messages of `history` are forwarded, and the region
    /// tag, when given, is applied to the outbound text only. Returns the text
    /// of the first choice; a response without one is an [`Error::Upstream`].
    pub async fn complete(
        &self,
        history: &[Message],
        new_user_text: &str,
        region: Option<&Region>,
        model: &Model,
    ) -> Result<String> {
        let request = build_request(history, new_user_text, region, model);
        let (status, body) = self.send_raw(&request).await?;
        let response = parse_response(status, &body)?;
        match response.reply_text() {
            Some(text) => Ok(text.to_string()),
            None => {
                warn!(status, "completion response has no reply text");
                COMPLETION_UPSTREAM_ERRORS.click();
                Err(Error::upstream(status, body))
            }
        }
    }
}

fn parse_response(status: u16, body: &str) -> Result<ChatCompletionResponse> {
    serde_json::from_str::<ChatCompletionResponse>(body).map_err(|_| {
        warn!(status, "completion response is not valid JSON");
        COMPLETION_UPSTREAM_ERRORS.click();
        Error::upstream(status, body)
    })
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join replaces the last segment unless the base ends in a slash.
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("{raw} cannot be used as an API root"), None));
    }
    Ok(url)
}
