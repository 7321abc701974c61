//! Gemini HTTP backend for [`GenerativeService`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::trait_def::{GenerateRequest, GenerativeService, ServiceError};
use super::types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

const SERVICE: &str = "gemini";

/// Gemini `generateContent` client returning schema-constrained JSON.
pub struct GeminiService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiService {
    pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            model: model.into(),
        }
    }

    /// Point the client at a different endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport {
        service: SERVICE.to_string(),
        message: e.to_string(),
    }
}

fn invalid(reason: impl Into<String>) -> ServiceError {
    ServiceError::InvalidResponse {
        service: SERVICE.to_string(),
        reason: reason.into(),
    }
}

fn parse_retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get("retry-after")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|seconds| (seconds * 1000.0) as u64)
}

#[async_trait]
impl GenerativeService for GeminiService {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<serde_json::Value, ServiceError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(request.prompt.clone()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema.clone(),
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let retry_after_ms = parse_retry_after_ms(response.headers());
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => ServiceError::RateLimited {
                    service: SERVICE.to_string(),
                    retry_after_ms,
                },
                s if s.is_server_error() => ServiceError::Server {
                    service: SERVICE.to_string(),
                    status: s.as_u16(),
                    message,
                },
                s => ServiceError::Request {
                    service: SERVICE.to_string(),
                    status: s.as_u16(),
                    message,
                },
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| invalid(format!("failed to parse response envelope: {e}")))?;

        let text = parsed
            .first_text()
            .ok_or_else(|| invalid("no text candidate in response"))?;

        serde_json::from_str(text).map_err(|e| invalid(format!("candidate text is not JSON: {e}")))
    }
}

impl std::fmt::Debug for GeminiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiService")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
