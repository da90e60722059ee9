pub mod collaborators;
pub mod functions;
pub mod metrics;
pub mod providers;
pub mod uploads;

pub use collaborators::Collaborators;
pub use functions::{AnalysisToolkit, LocalToolkit, MockAnalysisToolkit, ToolError};
pub use providers::{AnswerProvider, MockAnswerProvider, OpenAiAnswerProvider, ProviderError};
pub use uploads::{TempDirUploadStore, UploadError, UploadStore};
