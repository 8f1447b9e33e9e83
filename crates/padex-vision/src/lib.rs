//! Vision-OCR abstraction layer for padex.
//!
//! This crate provides a unified interface for reading passport data pages
//! from document images across different backends:
//! - an OpenAI-compatible chat-completions API for production use
//! - a disabled backend for offline runs and tests

mod backend;
mod error;
mod parse;

pub use backend::openai::{OpenAiBackend, OpenAiConfig, API_KEY_ENV, API_KEY_ENV_FALLBACK};
pub use backend::{DisabledBackend, VisionBackend, VisionFields};
pub use error::VisionError;
pub use parse::parse_reply;

/// Result type for vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;
