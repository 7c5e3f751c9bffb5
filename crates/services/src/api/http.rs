use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use roadmap_core::model::{
    AuthToken, CareerId, CareerRoadmap, ProgressUpdate, Stream, User, UserProgress,
};

use super::{
    ApiError, AuthResponse, LoginRequest, RegisterRequest, RoadmapApi, StreamUpdateRequest,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8001";
const UNAUTHORIZED_FALLBACK: &str = "Invalid authentication credentials";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    /// Server origin without the `/api` prefix.
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Reads `ROADMAP_API_URL` and `ROADMAP_API_TIMEOUT_SECS`.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env::var("ROADMAP_API_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let timeout = env::var("ROADMAP_API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self { base_url, timeout }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url.trim_end_matches('/'))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// `RoadmapApi` over HTTP/JSON with bearer-token auth.
#[derive(Clone)]
pub struct HttpRoadmapApi {
    client: Client,
    config: ApiConfig,
}

impl HttpRoadmapApi {
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(transport_error)?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        response.json::<T>().await.map_err(transport_error)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "request rejected");
        Err(error_from_response(status, &body))
    }
}

#[async_trait]
impl RoadmapApi for HttpRoadmapApi {
    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let url = self.config.endpoint("/auth/register");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let url = self.config.endpoint("/auth/login");
        self.send_json(self.client.post(url).json(request)).await
    }

    async fn current_user(&self, token: &AuthToken) -> Result<User, ApiError> {
        let url = self.config.endpoint("/auth/me");
        self.send_json(self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn update_stream(&self, token: &AuthToken, stream: Stream) -> Result<(), ApiError> {
        let url = self.config.endpoint("/user/stream");
        let body = StreamUpdateRequest { stream };
        self.send(self.client.put(url).bearer_auth(token.as_str()).json(&body))
            .await?;
        Ok(())
    }

    async fn list_roadmaps(
        &self,
        token: &AuthToken,
        stream: Option<Stream>,
    ) -> Result<Vec<CareerRoadmap>, ApiError> {
        let url = self.config.endpoint("/roadmaps");
        let mut request = self.client.get(url).bearer_auth(token.as_str());
        if let Some(stream) = stream {
            request = request.query(&[("stream", stream.as_str())]);
        }
        self.send_json(request).await
    }

    async fn get_roadmap(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<CareerRoadmap, ApiError> {
        let url = self.config.endpoint(&format!("/roadmaps/{career_id}"));
        self.send_json(self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn list_progress(&self, token: &AuthToken) -> Result<Vec<UserProgress>, ApiError> {
        let url = self.config.endpoint("/progress");
        self.send_json(self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn get_progress(
        &self,
        token: &AuthToken,
        career_id: &CareerId,
    ) -> Result<UserProgress, ApiError> {
        let url = self.config.endpoint(&format!("/progress/{career_id}"));
        self.send_json(self.client.get(url).bearer_auth(token.as_str()))
            .await
    }

    async fn update_progress(
        &self,
        token: &AuthToken,
        update: &ProgressUpdate,
    ) -> Result<(), ApiError> {
        let url = self.config.endpoint("/progress");
        self.send(self.client.post(url).bearer_auth(token.as_str()).json(update))
            .await?;
        Ok(())
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Maps a non-2xx response to an `ApiError`, preferring the server's
/// `detail` message.
pub(crate) fn error_from_response(status: StatusCode, body: &str) -> ApiError {
    let detail = detail_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ApiError::Unauthorized(detail.unwrap_or_else(|| UNAUTHORIZED_FALLBACK.into()))
        }
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message: detail
                .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16())),
        },
    }
}

/// `detail` is either a string or, for validation failures, a list of
/// objects carrying `msg`.
fn detail_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(message) if !message.trim().is_empty() => Some(message.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_api_prefix() {
        let config = ApiConfig::new("http://127.0.0.1:8001/");
        assert_eq!(
            config.endpoint("/roadmaps/abc"),
            "http://127.0.0.1:8001/api/roadmaps/abc"
        );
    }

    #[test]
    fn string_detail_is_used_verbatim() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Email already registered"}"#,
        );
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 400,
                message: "Email already registered".into()
            }
        );
    }

    #[test]
    fn unauthorized_status_maps_to_unauthorized() {
        let err = error_from_response(
            StatusCode::UNAUTHORIZED,
            r#"{"detail":"Invalid email or password"}"#,
        );
        assert_eq!(err, ApiError::Unauthorized("Invalid email or password".into()));

        let err = error_from_response(StatusCode::FORBIDDEN, "Not authenticated");
        assert_eq!(err, ApiError::Unauthorized(UNAUTHORIZED_FALLBACK.into()));
    }

    #[test]
    fn validation_detail_list_is_joined() {
        let body = r#"{"detail":[{"loc":["body","email"],"msg":"field required"},{"msg":"value is not a valid email address"}]}"#;
        let err = error_from_response(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(
            err.user_message(),
            "field required; value is not a valid email address"
        );
    }

    #[test]
    fn missing_detail_falls_back_to_status() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>");
        assert_eq!(err.user_message(), "Request failed with status 500");
    }

    #[test]
    fn client_builds_with_timeout() {
        let config = ApiConfig::default().with_timeout(Duration::from_secs(5));
        let api = HttpRoadmapApi::new(config).unwrap();
        assert_eq!(api.config().timeout, Some(Duration::from_secs(5)));
    }
}
