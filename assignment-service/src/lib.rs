//! HTTP service that answers assignment questions through a language model
//! and exposes analysis helpers for direct testing.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
