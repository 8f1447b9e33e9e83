//! Core library for passport document processing.
//!
//! This crate provides:
//! - PDF handling (embedded text, first-page rasterization via poppler)
//! - a regex text-pattern matcher for passport data pages
//! - an extraction orchestrator with a vision-OCR fallback and
//!   presence-based confidence scoring
//! - case-readiness rules for citizenship-case submission

pub mod error;
pub mod extract;
pub mod models;
pub mod pdf;
pub mod rules;

pub use error::{PadexError, PdfError, RasterError, Result};
pub use extract::{presence_confidence, DocumentExtractor, TextMatch};
pub use models::case::{CaseAssessment, CaseStatus, DocumentKind};
pub use models::config::{ExtractionConfig, PadexConfig, RasterConfig};
pub use models::extraction::{ExtractionResult, FieldSet, TextEncoding};
pub use pdf::{PageRasterizer, PdftoppmRasterizer, RasterPage};
pub use rules::{apply_override, assess_case};

/// Re-export vision types.
pub use padex_vision::{
    DisabledBackend, OpenAiBackend, OpenAiConfig, VisionBackend, VisionError, VisionFields,
};
