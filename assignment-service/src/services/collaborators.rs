//! Composition root: picks the implementations behind each collaborator trait.

use super::functions::{AnalysisToolkit, LocalToolkit, MockAnalysisToolkit};
use super::providers::{AnswerProvider, MockAnswerProvider, OpenAiAnswerProvider, OpenAiSettings};
use super::uploads::{TempDirUploadStore, UploadStore};
use crate::config::{AssignmentConfig, CollaboratorMode};
use service_core::error::AppError;
use std::sync::Arc;

/// The external components the handlers delegate to.
#[derive(Clone)]
pub struct Collaborators {
    pub uploads: Arc<dyn UploadStore>,
    pub answers: Arc<dyn AnswerProvider>,
    pub toolkit: Arc<dyn AnalysisToolkit>,
}

impl Collaborators {
    pub fn from_config(config: &AssignmentConfig) -> Result<Self, AppError> {
        let uploads: Arc<dyn UploadStore> =
            Arc::new(TempDirUploadStore::new(config.uploads.dir.clone()));

        let (answers, toolkit): (Arc<dyn AnswerProvider>, Arc<dyn AnalysisToolkit>) =
            match config.mode {
                CollaboratorMode::Live => {
                    let api_key = config.openai.api_key.clone().ok_or_else(|| {
                        AppError::ConfigError(anyhow::anyhow!(
                            "OPENAI_API_KEY is required in live mode"
                        ))
                    })?;
                    let provider = OpenAiAnswerProvider::new(OpenAiSettings {
                        api_key,
                        base_url: config.openai.base_url.clone(),
                        model: config.openai.model.clone(),
                        max_attachment_bytes: config.openai.max_attachment_bytes,
                    })
                    .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?;

                    tracing::info!(
                        model = %config.openai.model,
                        base_url = %config.openai.base_url,
                        "Initialized OpenAI answer provider"
                    );

                    (
                        Arc::new(provider),
                        Arc::new(LocalToolkit::new(config.tools.prettier_command.clone())),
                    )
                }
                CollaboratorMode::Mock => {
                    tracing::warn!("Using mock answer provider and analysis toolkit");
                    (
                        Arc::new(MockAnswerProvider::new()),
                        Arc::new(MockAnalysisToolkit::new()),
                    )
                }
            };

        Ok(Self {
            uploads,
            answers,
            toolkit,
        })
    }
}
