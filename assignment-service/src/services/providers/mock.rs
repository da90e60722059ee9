//! Offline answer provider.

use super::{AnswerProvider, ProviderError};
use async_trait::async_trait;
use std::path::Path;

/// Echoes the question back; used when no model API is configured.
#[derive(Debug, Default)]
pub struct MockAnswerProvider;

impl MockAnswerProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnswerProvider for MockAnswerProvider {
    async fn answer(
        &self,
        question: &str,
        _file_path: Option<&Path>,
    ) -> Result<String, ProviderError> {
        Ok(format!("Mock response for: {}", question))
    }
}
