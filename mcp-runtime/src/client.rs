//! Request layer: the one place that talks HTTP to the Edgee API.
//!
//! Every endpoint goes through [`ApiClient::send`]. It attaches the bearer
//! credential, encodes the query and body, and classifies the outcome into a
//! typed value or an [`ApiError`].

use std::fmt;
use std::sync::Arc;

use edgee_core::{ErrorResponse, ErrorType, QueryFields};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::credentials::CredentialProvider;

pub const DEFAULT_API_URL: &str = "https://api.edgee.app";

const UNKNOWN_ERROR: &str = "Unknown error";

pub fn default_user_agent() -> String {
    format!("edgee-mcp/{}", env!("CARGO_PKG_VERSION"))
}

/// Where requests go and how they identify themselves.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: Url,
    user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigurationError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| {
            ConfigurationError::new(format!("Invalid API base URL '{base_url}': {e}"))
        })?;
        if parsed.cannot_be_a_base() || !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigurationError::new(format!(
                "Invalid API base URL '{base_url}': expected an http(s) URL"
            )));
        }
        Ok(Self {
            base_url: parsed,
            user_agent: default_user_agent(),
        })
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Describes a single API call.
///
/// The path is kept as raw segments; each one is percent-encoded on its own
/// when the URL is built, so an identifier can never add path levels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    segments: Vec<String>,
    query: QueryFields,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::Get)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::Put)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::Delete)
    }

    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.segments
            .extend(segments.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn query(mut self, fields: QueryFields) -> Self {
        self.query.extend(fields);
        self
    }

    pub fn json_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// `/v1/...` form of the path, unencoded. Used for logs and tests.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    /// Query pairs actually sent, in order, with absent values dropped.
    pub fn query_pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.query
            .iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (*key, v)))
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}

/// Raised before any network activity when the client cannot make a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigurationError {
    message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn missing_token(source: &str) -> Self {
        Self::new(format!("{source} is required"))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A failed API call.
///
/// `status` is the HTTP status when the server answered, `0` when no usable
/// response exists (transport failure, unreadable body, unparseable success).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    message: String,
    status: u16,
    error_response: Option<ErrorResponse>,
}

impl ApiFailure {
    pub(crate) fn http(status: u16, error_response: Option<ErrorResponse>) -> Self {
        Self {
            message: format!("HTTP error! status: {status}"),
            status,
            error_response,
        }
    }

    pub(crate) fn transport(message: impl fmt::Display) -> Self {
        let message = message.to_string();
        Self {
            message: if message.trim().is_empty() {
                UNKNOWN_ERROR.to_string()
            } else {
                message
            },
            status: 0,
            error_response: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn error_response(&self) -> Option<&ErrorResponse> {
        self.error_response.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Api(#[from] ApiFailure),
}

impl ApiError {
    /// HTTP status of the failure; `0` when the server never answered.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Configuration(_) => 0,
            ApiError::Api(failure) => failure.status(),
        }
    }

    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match self {
            ApiError::Configuration(_) => None,
            ApiError::Api(failure) => failure.error_response(),
        }
    }

    pub fn error_type(&self) -> Option<&ErrorType> {
        self.error_response().map(|payload| &payload.error.kind)
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Configuration(err) => err.message(),
            ApiError::Api(failure) => failure.message(),
        }
    }
}

/// Shared, cheap-to-clone handle on the Edgee API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    credentials: Arc<dyn CredentialProvider>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            config,
            credentials,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Performs one request and decodes a 2xx body into `T`. Never retries.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let result = self.execute(&request).await;
        if let Err(err) = &result {
            log_failure(&request, err);
        }
        result
    }

    pub(crate) async fn get<T, S>(&self, segments: &[S]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        self.send(ApiRequest::get().segments(segments)).await
    }

    pub(crate) async fn get_with<T, S>(
        &self,
        segments: &[S],
        query: QueryFields,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        self.send(ApiRequest::get().segments(segments).query(query))
            .await
    }

    pub(crate) async fn post<T, S, B>(&self, segments: &[S], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::post()
            .segments(segments)
            .json_body(encode_body(body)?);
        self.send(request).await
    }

    pub(crate) async fn put<T, S, B>(&self, segments: &[S], body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::put()
            .segments(segments)
            .json_body(encode_body(body)?);
        self.send(request).await
    }

    pub(crate) async fn delete<T, S>(&self, segments: &[S]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        S: AsRef<str>,
    {
        self.send(ApiRequest::delete().segments(segments)).await
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiFailure> {
        let mut url = self.config.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiFailure::transport("API base URL cannot carry a path"))?;
            path.pop_if_empty();
            path.extend(&request.segments);
        }
        let mut pairs = request.query_pairs().peekable();
        if pairs.peek().is_some() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, ApiError> {
        let token = self
            .credentials
            .bearer_token()
            .ok_or_else(|| ConfigurationError::missing_token(&self.credentials.source()))?;
        let url = self.url_for(request)?;

        let mut builder = self
            .http
            .request(request.method.into(), url)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(ApiFailure::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiFailure::transport)?;

        if !status.is_success() {
            let payload = serde_json::from_slice::<ErrorResponse>(&bytes).ok();
            return Err(ApiFailure::http(status.as_u16(), payload).into());
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| ApiFailure::transport(format!("Invalid JSON response: {e}")).into())
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|e| ApiFailure::transport(format!("Failed to encode request body: {e}")).into())
}

fn log_failure(request: &ApiRequest, err: &ApiError) {
    let method = request.method.as_str();
    let path = request.path();
    match err {
        ApiError::Api(failure) if failure.status() > 0 => {
            let remote = failure.error_response().map(|payload| &payload.error);
            tracing::warn!(
                method,
                path = %path,
                status = failure.status(),
                error_type = remote.map(|e| e.kind.as_str()),
                remote_message = remote.map(|e| e.message.as_str()),
                "Edgee API rejected request"
            );
        }
        ApiError::Api(failure) => {
            tracing::error!(
                method,
                path = %path,
                error = %failure.message(),
                "Edgee API request failed"
            );
        }
        ApiError::Configuration(config) => {
            tracing::error!(
                method,
                path = %path,
                error = %config.message(),
                "Edgee API request not sent"
            );
        }
    }
}
