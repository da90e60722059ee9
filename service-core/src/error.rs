use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// A required form field was not supplied.
    #[error("Field required: {0}")]
    MissingField(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Collaborator failure; the message is returned to the caller verbatim.
    #[error("{0}")]
    Internal(String),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            detail: serde_json::Value,
        }

        let (status, detail) = match self {
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, json!(err.to_string())),
            AppError::MissingField(field) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!([{
                    "type": "missing",
                    "loc": ["body", field],
                    "msg": "Field required",
                }]),
            ),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, json!(msg)),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, json!(msg)),
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!("Internal server error"),
                )
            }
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!(format!("Configuration error: {}", err)),
            ),
        };

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn internal_message_is_returned_verbatim() {
        let response = AppError::Internal("upstream exploded".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({"detail": "upstream exploded"}));
    }

    #[tokio::test]
    async fn missing_field_reports_location() {
        let response = AppError::MissingField("question".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["detail"][0]["loc"], json!(["body", "question"]));
        assert_eq!(body["detail"][0]["msg"], "Field required");
    }

    #[tokio::test]
    async fn anyhow_errors_are_not_leaked() {
        let response =
            AppError::InternalError(anyhow::anyhow!("secret connection string")).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["detail"], "Internal server error");
    }
}
