//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint that implements `POST {base_url}/chat/completions`
//! with bearer authentication (OpenAI itself, or a proxy in front of it).

use super::{AnswerProvider, ProviderError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You answer questions from graded data-science assignments. \
Reply with only the final answer: no explanation, no markdown, no surrounding quotes.";

/// Connection settings for the chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Text attachments are cut to this many bytes before being sent.
    pub max_attachment_bytes: usize,
}

pub struct OpenAiAnswerProvider {
    settings: OpenAiSettings,
    client: Client,
}

impl OpenAiAnswerProvider {
    pub fn new(settings: OpenAiSettings) -> Result<Self, ProviderError> {
        if settings.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "OpenAI API key not configured".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { settings, client })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Builds the user message: the question, followed by the attachment if any.
    async fn user_content(
        &self,
        question: &str,
        file_path: Option<&Path>,
    ) -> Result<String, ProviderError> {
        let Some(path) = file_path else {
            return Ok(question.to_string());
        };

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ProviderError::Attachment {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Ok(format!(
            "{}\n\n{}",
            question,
            describe_attachment(path, &bytes, self.settings.max_attachment_bytes)
        ))
    }
}

/// Renders a file for inclusion in a prompt. UTF-8 text is inlined (cut at
/// `limit` bytes on a char boundary); anything else is described by name and size.
fn describe_attachment(path: &Path, bytes: &[u8], limit: usize) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            let mut end = text.len().min(limit);
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            let truncated = if end < text.len() {
                format!("\n[truncated: {} of {} bytes shown]", end, text.len())
            } else {
                String::new()
            };
            format!(
                "Attached file `{}`:\n```\n{}\n```{}",
                name,
                &text[..end],
                truncated
            )
        }
        Err(_) => format!(
            "Attached file `{}` is binary ({} bytes) and cannot be shown inline.",
            name,
            bytes.len()
        ),
    }
}

#[async_trait]
impl AnswerProvider for OpenAiAnswerProvider {
    async fn answer(
        &self,
        question: &str,
        file_path: Option<&Path>,
    ) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.settings.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: self.user_content(question, file_path).await?,
                },
            ],
        };

        tracing::debug!(
            model = %self.settings.model,
            question_len = question.len(),
            has_file = file_path.is_some(),
            "Sending request to chat completions API"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        if let Some(usage) = &api_response.usage {
            tracing::info!(
                model = %self.settings.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Chat completion finished"
            );
        }

        api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

// ============================================================================
// Chat Completions API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> OpenAiSettings {
        OpenAiSettings {
            api_key: "sk-test".to_string(),
            base_url: base_url.to_string(),
            model: "gpt-4o-mini".to_string(),
            max_attachment_bytes: 8,
        }
    }

    #[test]
    fn rejects_empty_api_key() {
        let mut s = settings("https://api.openai.com/v1");
        s.api_key.clear();
        assert!(matches!(
            OpenAiAnswerProvider::new(s),
            Err(ProviderError::NotConfigured(_))
        ));
    }

    #[test]
    fn api_url_tolerates_trailing_slash() {
        let provider = OpenAiAnswerProvider::new(settings("http://proxy.local/v1/")).unwrap();
        assert_eq!(provider.api_url(), "http://proxy.local/v1/chat/completions");
    }

    #[test]
    fn text_attachments_are_inlined_and_truncated() {
        let rendered = describe_attachment(Path::new("/tmp/x/notes.txt"), b"0123456789", 8);
        assert!(rendered.starts_with("Attached file `notes.txt`"));
        assert!(rendered.contains("01234567\n```"));
        assert!(rendered.contains("[truncated: 8 of 10 bytes shown]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // "é" is two bytes; a limit of 1 must not split it.
        let rendered = describe_attachment(Path::new("a.txt"), "é".as_bytes(), 1);
        assert!(rendered.contains("```\n\n```"));
    }

    #[test]
    fn binary_attachments_are_described() {
        let rendered = describe_attachment(Path::new("data.zip"), &[0xff, 0xfe, 0x00], 1024);
        assert_eq!(
            rendered,
            "Attached file `data.zip` is binary (3 bytes) and cannot be shown inline."
        );
    }

    #[test]
    fn response_parsing_reads_first_choice() {
        let body = r#"{
            "choices": [{"message": {"role": "assistant", "content": " 42 \n"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 1, "total_tokens": 13}
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some(" 42 \n"));
        assert_eq!(parsed.usage.unwrap().prompt_tokens, 12);
    }
}
