#![allow(dead_code)]

use assignment_service::config::AssignmentConfig;
use assignment_service::services::{
    AnalysisToolkit, AnswerProvider, Collaborators, LocalToolkit, ProviderError, TempDirUploadStore,
    ToolError,
};
use assignment_service::startup::Application;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// A call observed by [`RecordingProvider`]: the question and, if a file was
/// attached, its path and contents at call time.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub question: String,
    pub file: Option<(PathBuf, Vec<u8>)>,
}

/// Answers `answer:<question>` and records every call.
#[derive(Default)]
pub struct RecordingProvider {
    pub calls: Mutex<Vec<RecordedCall>>,
}

#[async_trait]
impl AnswerProvider for RecordingProvider {
    async fn answer(
        &self,
        question: &str,
        file_path: Option<&Path>,
    ) -> Result<String, ProviderError> {
        let file = match file_path {
            Some(path) => Some((
                path.to_path_buf(),
                tokio::fs::read(path).await.expect("upload must be readable"),
            )),
            None => None,
        };
        self.calls.lock().unwrap().push(RecordedCall {
            question: question.to_string(),
            file,
        });
        Ok(format!("answer:{}", question))
    }
}

/// Always fails with a rate-limit error.
pub struct FailingProvider;

#[async_trait]
impl AnswerProvider for FailingProvider {
    async fn answer(&self, _: &str, _: Option<&Path>) -> Result<String, ProviderError> {
        Err(ProviderError::RateLimited)
    }
}

/// Panics inside the sales analysis.
pub struct PanickingToolkit;

#[async_trait]
impl AnalysisToolkit for PanickingToolkit {
    async fn analyze_sales_with_phonetic_clustering(
        &self,
        _: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        panic!("analysis blew up")
    }

    async fn calculate_prettier_sha256(&self, _: &Path) -> Result<Value, ToolError> {
        Err(ToolError::CommandFailed("formatter unavailable".to_string()))
    }
}

pub struct TestApp {
    pub address: String,
    pub upload_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawns the app with a recording provider and the local toolkit, with
    /// `cat` standing in for prettier so hashes are of the raw upload.
    pub async fn spawn() -> (Self, Arc<RecordingProvider>) {
        let provider = Arc::new(RecordingProvider::default());
        let toolkit = Arc::new(LocalToolkit::new(vec!["cat".to_string()]));
        let app = Self::spawn_with(provider.clone(), toolkit).await;
        (app, provider)
    }

    pub async fn spawn_with(
        answers: Arc<dyn AnswerProvider>,
        toolkit: Arc<dyn AnalysisToolkit>,
    ) -> Self {
        let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
        let config = AssignmentConfig::mock(upload_dir.path());

        let collaborators = Collaborators {
            uploads: Arc::new(TempDirUploadStore::new(upload_dir.path())),
            answers,
            toolkit,
        };

        let app = Application::build_with(config, collaborators)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        for _ in 0..50 {
            if client.get(format!("{}/health", address)).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }

        TestApp {
            address,
            upload_dir,
            client,
        }
    }

    pub async fn post_form(&self, path: &str, form: reqwest::multipart::Form) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub fn file_part(name: &str, bytes: &[u8]) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec())
        .file_name(name.to_string())
        .mime_str("application/octet-stream")
        .unwrap()
}
