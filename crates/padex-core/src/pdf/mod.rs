//! PDF handling: structural sniffing, embedded text, and first-page
//! rasterization.

mod raster;
mod text;

pub use raster::{PageRasterizer, PdftoppmRasterizer, RasterPage};
pub use text::{extract_embedded_text, sniff, PdfInfo};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
