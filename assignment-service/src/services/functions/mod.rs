//! Analysis functions reachable through the debug route.

pub mod mock;
pub mod phonetic;
pub mod prettier;
pub mod sales;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

pub use mock::MockAnalysisToolkit;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// The functions the debug route can invoke directly.
#[async_trait]
pub trait AnalysisToolkit: Send + Sync {
    /// Takes the request's parameter map as keyword arguments.
    async fn analyze_sales_with_phonetic_clustering(
        &self,
        params: Map<String, Value>,
    ) -> Result<Value, ToolError>;

    async fn calculate_prettier_sha256(&self, file_path: &Path) -> Result<Value, ToolError>;
}

/// Toolkit backed by the local implementations in this module.
pub struct LocalToolkit {
    prettier_command: Vec<String>,
}

impl LocalToolkit {
    pub fn new(prettier_command: Vec<String>) -> Self {
        Self { prettier_command }
    }
}

#[async_trait]
impl AnalysisToolkit for LocalToolkit {
    async fn analyze_sales_with_phonetic_clustering(
        &self,
        params: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        sales::analyze(sales::SalesQuery::from_params(params)?).await
    }

    async fn calculate_prettier_sha256(&self, file_path: &Path) -> Result<Value, ToolError> {
        prettier::calculate_sha256(&self.prettier_command, file_path).await
    }
}
