//! Language-model provider abstraction.
//!
//! Handlers only see [`AnswerProvider`]; the composition root decides whether
//! the OpenAI client or the mock backs it.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Model returned no answer")]
    EmptyResponse,

    #[error("Failed to read attachment {path}: {message}")]
    Attachment { path: String, message: String },
}

/// Produces a textual answer to a question, optionally using an uploaded file.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, question: &str, file_path: Option<&Path>)
        -> Result<String, ProviderError>;
}

pub use mock::MockAnswerProvider;
pub use openai::{OpenAiAnswerProvider, OpenAiSettings};
