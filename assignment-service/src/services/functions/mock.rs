//! Canned toolkit for running without the real analysis dependencies.

use super::{AnalysisToolkit, ToolError};
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::path::Path;

#[derive(Debug, Default)]
pub struct MockAnalysisToolkit;

impl MockAnalysisToolkit {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AnalysisToolkit for MockAnalysisToolkit {
    async fn analyze_sales_with_phonetic_clustering(
        &self,
        _params: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        Ok(json!({"result": "Mock analysis result"}))
    }

    async fn calculate_prettier_sha256(&self, _file_path: &Path) -> Result<Value, ToolError> {
        Ok(json!({"hash": "mock_sha256_hash"}))
    }
}
