use serde::Serialize;

pub const WELCOME_MESSAGE: &str = "Welcome to the IITM Assignment API";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

impl Default for WelcomeResponse {
    fn default() -> Self {
        Self {
            message: WELCOME_MESSAGE,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Body of every `/debug/{function_name}` response. All variants are sent
/// with status 200.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DebugResponse {
    Result {
        result: serde_json::Value,
    },
    /// Soft error: unknown function or a missing required file.
    Error {
        error: String,
    },
    /// Failure while dispatching, with the full error chain.
    Failure {
        error: String,
        traceback: String,
    },
}
