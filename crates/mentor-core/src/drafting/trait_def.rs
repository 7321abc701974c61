//! The `GenerativeService` trait -- the adapter interface for structured
//! text generation backends.
//!
//! A backend receives a natural-language instruction plus a JSON response
//! schema and returns the JSON value it produced. It makes exactly one
//! outbound call per invocation; retrying is the caller's concern.

use async_trait::async_trait;
use thiserror::Error;

/// A single structured-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// Natural-language instruction.
    pub prompt: String,
    /// Schema the response must conform to (OpenAPI-style subset).
    pub response_schema: serde_json::Value,
}

/// Failures reported by a [`GenerativeService`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("rate limited by {service}")]
    RateLimited {
        service: String,
        /// Server-suggested wait, when it sent one.
        retry_after_ms: Option<u64>,
    },

    #[error("{service} returned server error {status}: {message}")]
    Server {
        service: String,
        status: u16,
        message: String,
    },

    #[error("{service} rejected the request with status {status}: {message}")]
    Request {
        service: String,
        status: u16,
        message: String,
    },

    #[error("transport error talking to {service}: {message}")]
    Transport { service: String, message: String },

    #[error("invalid response from {service}: {reason}")]
    InvalidResponse { service: String, reason: String },
}

impl ServiceError {
    /// Whether the failure belongs to the retryable class: rate limits,
    /// 5xx responses, and failures that never produced a status.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. } | Self::Server { .. } | Self::Transport { .. }
        )
    }

    /// Server-requested wait before the next attempt, if any.
    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Self::RateLimited {
                retry_after_ms: Some(ms),
                ..
            } => Some(std::time::Duration::from_millis(*ms)),
            _ => None,
        }
    }

    /// HTTP-style status code for logging. Rate limits report 429 and
    /// status-less failures report 500.
    pub fn status(&self) -> u16 {
        match self {
            Self::RateLimited { .. } => 429,
            Self::Server { status, .. } | Self::Request { status, .. } => *status,
            Self::Transport { .. } | Self::InvalidResponse { .. } => 500,
        }
    }
}

/// Adapter interface for structured text generation.
#[async_trait]
pub trait GenerativeService: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Issue one generation call and return the parsed JSON it produced.
    async fn generate(&self, request: &GenerateRequest) -> Result<serde_json::Value, ServiceError>;
}

// Compile-time assertion: GenerativeService must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn GenerativeService) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoService;

    #[async_trait]
    impl GenerativeService for EchoService {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<serde_json::Value, ServiceError> {
            Ok(serde_json::json!({ "prompt": request.prompt }))
        }
    }

    #[tokio::test]
    async fn service_is_usable_as_trait_object() {
        let service: Box<dyn GenerativeService> = Box::new(EchoService);
        assert_eq!(service.name(), "echo");

        let request = GenerateRequest {
            prompt: "hi".to_string(),
            response_schema: serde_json::json!({ "type": "OBJECT" }),
        };
        let value = service.generate(&request).await.unwrap();
        assert_eq!(value["prompt"], "hi");
    }

    #[test]
    fn transient_classification() {
        let svc = "gemini".to_string();
        assert!(ServiceError::RateLimited { service: svc.clone(), retry_after_ms: None }.is_transient());
        assert!(
            ServiceError::Server { service: svc.clone(), status: 503, message: String::new() }
                .is_transient()
        );
        assert!(
            ServiceError::Transport { service: svc.clone(), message: "reset".into() }.is_transient()
        );
        assert!(
            !ServiceError::Request { service: svc.clone(), status: 400, message: String::new() }
                .is_transient()
        );
        assert!(
            !ServiceError::InvalidResponse { service: svc, reason: "not json".into() }
                .is_transient()
        );
    }

    #[test]
    fn retry_after_only_from_rate_limits() {
        let svc = "gemini".to_string();
        assert_eq!(
            ServiceError::RateLimited { service: svc.clone(), retry_after_ms: Some(1500) }.retry_after(),
            Some(std::time::Duration::from_millis(1500))
        );
        assert_eq!(
            ServiceError::RateLimited { service: svc.clone(), retry_after_ms: None }.retry_after(),
            None
        );
        assert_eq!(
            ServiceError::Server { service: svc, status: 503, message: String::new() }.retry_after(),
            None
        );
    }

    #[test]
    fn status_codes_for_logging() {
        let svc = "gemini".to_string();
        assert_eq!(
            ServiceError::RateLimited { service: svc.clone(), retry_after_ms: Some(10) }.status(),
            429
        );
        assert_eq!(
            ServiceError::Request { service: svc.clone(), status: 403, message: String::new() }
                .status(),
            403
        );
        assert_eq!(ServiceError::Transport { service: svc, message: String::new() }.status(), 500);
    }
}
