//! Structured generation: the service seam, its HTTP backend, retry, and
//! the drafting client built on top.

pub mod client;
pub mod error;
pub mod gemini;
pub mod retry;
pub mod trait_def;
pub mod types;

pub use client::DraftingClient;
pub use error::DraftError;
pub use gemini::GeminiService;
pub use retry::RetryPolicy;
pub use trait_def::{GenerateRequest, GenerativeService, ServiceError};
