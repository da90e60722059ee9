//! Multipart form parsing.
//!
//! Both POST routes accept `multipart/form-data`. A request without a
//! multipart body is treated as an empty form so that defaults apply.

use axum::extract::multipart::{Field, Multipart, MultipartError};
use axum::http::StatusCode;
use axum::body::Bytes;
use service_core::error::AppError;

/// Default value of the `params` field on the debug route.
pub const DEFAULT_PARAMS: &str = "{}";

/// A file received in the `file` form field.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Form accepted by `POST /api/`.
#[derive(Debug)]
pub struct QuestionForm {
    pub question: String,
    pub file: Option<UploadedFile>,
}

/// Form accepted by `POST /debug/{function_name}`.
#[derive(Debug)]
pub struct DebugForm {
    pub file: Option<UploadedFile>,
    pub params: String,
}

impl QuestionForm {
    pub async fn from_multipart(multipart: Option<Multipart>) -> Result<Self, AppError> {
        let mut question = None;
        let mut file = None;

        if let Some(mut multipart) = multipart {
            while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
                let name = field.name().map(str::to_string);
                match name.as_deref() {
                    Some("question") => {
                        question = Some(field.text().await.map_err(multipart_error)?)
                    }
                    Some("file") => file = read_file(field).await?,
                    _ => {}
                }
            }
        }

        // An empty value counts as missing, as with an omitted field.
        let question = question
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::MissingField("question".to_string()))?;
        Ok(Self { question, file })
    }
}

impl DebugForm {
    pub async fn from_multipart(multipart: Option<Multipart>) -> Result<Self, AppError> {
        let mut params = None;
        let mut file = None;

        if let Some(mut multipart) = multipart {
            while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
                let name = field.name().map(str::to_string);
                match name.as_deref() {
                    Some("params") => params = Some(field.text().await.map_err(multipart_error)?),
                    Some("file") => file = read_file(field).await?,
                    _ => {}
                }
            }
        }

        Ok(Self {
            file,
            params: params
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_PARAMS.to_string()),
        })
    }
}

/// Reads a `file` field. A part with neither a file name nor content is
/// what browsers send for an empty file input, and counts as no file.
async fn read_file(field: Field<'_>) -> Result<Option<UploadedFile>, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let bytes = field.bytes().await.map_err(multipart_error)?;

    match file_name {
        Some(name) if !name.is_empty() => Ok(Some(UploadedFile {
            file_name: name,
            content_type,
            bytes,
        })),
        _ if bytes.is_empty() => Ok(None),
        _ => Ok(Some(UploadedFile {
            file_name: "upload.bin".to_string(),
            content_type,
            bytes,
        })),
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart form: {}", err))
    }
}
