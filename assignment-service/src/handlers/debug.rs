//! `POST /debug/{function_name}`: invoke an analysis function directly.
//!
//! Unlike `/api/`, this route always answers 200. Unknown functions and a
//! missing required file are reported in-band as `{"error": …}`; any other
//! failure, including a panic, becomes `{"error": …, "traceback": …}`.

use crate::models::{DebugForm, DebugResponse};
use crate::startup::AppState;
use anyhow::Context;
use axum::extract::{Multipart, Path, State};
use axum::Json;
use futures::FutureExt;
use serde_json::{Map, Value};
use service_core::error::AppError;
use std::any::Any;
use std::panic::AssertUnwindSafe;

/// The closed set of functions the debug route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFunction {
    AnalyzeSalesWithPhoneticClustering,
    CalculatePrettierSha256,
}

impl DebugFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "analyze_sales_with_phonetic_clustering" => {
                Some(Self::AnalyzeSalesWithPhoneticClustering)
            }
            "calculate_prettier_sha256" => Some(Self::CalculatePrettierSha256),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::AnalyzeSalesWithPhoneticClustering => "analyze_sales_with_phonetic_clustering",
            Self::CalculatePrettierSha256 => "calculate_prettier_sha256",
        }
    }
}

pub async fn debug_function(
    State(state): State<AppState>,
    Path(function_name): Path<String>,
    multipart: Option<Multipart>,
) -> Result<Json<DebugResponse>, AppError> {
    let form = DebugForm::from_multipart(multipart).await?;

    let outcome = AssertUnwindSafe(dispatch(&state, &function_name, form))
        .catch_unwind()
        .await;

    let response = match outcome {
        Ok(Ok(response)) => response,
        Ok(Err(err)) => {
            tracing::warn!(function = %function_name, "Debug call failed: {:#}", err);
            DebugResponse::Failure {
                error: format!("{:#}", err),
                traceback: format!("{:?}", err),
            }
        }
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(function = %function_name, "Debug call panicked: {}", message);
            DebugResponse::Failure {
                traceback: format!("panicked while running {}: {}", function_name, message),
                error: message,
            }
        }
    };

    Ok(Json(response))
}

async fn dispatch(
    state: &AppState,
    function_name: &str,
    form: DebugForm,
) -> anyhow::Result<DebugResponse> {
    let temp_file_path = match form.file {
        Some(file) => Some(
            state
                .collaborators
                .uploads
                .save_temporarily(file)
                .await
                .context("saving uploaded file")?,
        ),
        None => None,
    };

    let mut parameters: Value =
        serde_json::from_str(&form.params).context("parsing params as JSON")?;

    if let Some(path) = &temp_file_path {
        params_object(&mut parameters)?.insert(
            "file_path".to_string(),
            Value::String(path.to_string_lossy().into_owned()),
        );
    }

    let Some(function) = DebugFunction::from_name(function_name) else {
        return Ok(DebugResponse::Error {
            error: format!("Function {} not supported for direct testing", function_name),
        });
    };

    tracing::info!(
        function = function.name(),
        has_file = temp_file_path.is_some(),
        "Dispatching debug call"
    );

    let toolkit = &state.collaborators.toolkit;
    let result = match function {
        DebugFunction::AnalyzeSalesWithPhoneticClustering => {
            let params = into_params_object(parameters)?;
            toolkit
                .analyze_sales_with_phonetic_clustering(params)
                .await
                .with_context(|| format!("running {}", function.name()))?
        }
        DebugFunction::CalculatePrettierSha256 => {
            let Some(path) = temp_file_path.as_deref() else {
                return Ok(missing_file(function));
            };
            toolkit
                .calculate_prettier_sha256(path)
                .await
                .with_context(|| format!("running {}", function.name()))?
        }
    };

    Ok(DebugResponse::Result { result })
}

fn missing_file(function: DebugFunction) -> DebugResponse {
    DebugResponse::Error {
        error: format!("No file provided for {}", function.name()),
    }
}

fn params_object(parameters: &mut Value) -> anyhow::Result<&mut Map<String, Value>> {
    parameters
        .as_object_mut()
        .ok_or_else(|| anyhow::anyhow!("params must be a JSON object"))
}

fn into_params_object(parameters: Value) -> anyhow::Result<Map<String, Value>> {
    match parameters {
        Value::Object(map) => Ok(map),
        _ => Err(anyhow::anyhow!("params must be a JSON object")),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
