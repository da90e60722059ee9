use crate::models::{AnswerResponse, QuestionForm};
use crate::startup::AppState;
use axum::extract::{Multipart, State};
use axum::Json;
use service_core::error::AppError;

/// `POST /api/`: answer a question, optionally with an attached file.
///
/// Any collaborator failure becomes a 500 whose `detail` is the error text.
pub async fn process_question(
    State(state): State<AppState>,
    multipart: Option<Multipart>,
) -> Result<Json<AnswerResponse>, AppError> {
    let form = QuestionForm::from_multipart(multipart).await?;

    let temp_file_path = match form.file {
        Some(file) => Some(
            state
                .collaborators
                .uploads
                .save_temporarily(file)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to store upload: {}", e);
                    AppError::Internal(e.to_string())
                })?,
        ),
        None => None,
    };

    let answer = state
        .collaborators
        .answers
        .answer(&form.question, temp_file_path.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(
                has_file = temp_file_path.is_some(),
                "Answer generation failed: {}",
                e
            );
            AppError::Internal(e.to_string())
        })?;

    tracing::info!(
        question_len = form.question.len(),
        has_file = temp_file_path.is_some(),
        "Question answered"
    );

    Ok(Json(AnswerResponse { answer }))
}
