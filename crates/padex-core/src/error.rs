//! Error types for the padex-core library.

use thiserror::Error;

/// Main error type for the padex library.
#[derive(Error, Debug)]
pub enum PadexError {
    /// PDF handling error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Page rasterization error.
    #[error("raster error: {0}")]
    Raster(#[from] RasterError),

    /// Vision backend error.
    #[error("vision error: {0}")]
    Vision(#[from] padex_vision::VisionError),

    /// Image decoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF handling.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to parse the PDF structure.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract embedded text.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted beyond the empty-password case.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors from the external page rasterizer.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The rasterizer binary was not found on PATH.
    #[error("rasterizer tool not found: {0}")]
    ToolMissing(String),

    /// The rasterizer exited with a non-zero status.
    #[error("rasterizer exited with status {code}: {stderr}")]
    Failed { code: i32, stderr: String },

    /// The rasterizer exceeded its wall-clock limit and was killed.
    #[error("rasterizer timed out after {0}s")]
    Timeout(u64),

    /// The rasterizer exited cleanly but produced no output file.
    #[error("rasterizer produced no output file")]
    NoOutput,

    /// I/O error around the temp files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the padex library.
pub type Result<T> = std::result::Result<T, PadexError>;
