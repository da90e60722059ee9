pub mod api;
pub mod app;
pub mod debug;

pub use api::process_question;
pub use app::{health_check, metrics, root};
pub use debug::debug_function;
