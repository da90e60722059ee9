//! Request and response shapes for the HTTP surface.

pub mod forms;
pub mod responses;

pub use forms::{DebugForm, QuestionForm, UploadedFile};
pub use responses::{AnswerResponse, DebugResponse, WelcomeResponse};
