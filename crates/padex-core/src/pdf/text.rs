//! Embedded-text access using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::Result;
use crate::error::PdfError;

/// What a structural parse learned about a PDF buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PdfInfo {
    /// Number of pages.
    pub page_count: u32,
    /// Whether the document was encrypted with the empty password.
    pub was_encrypted: bool,
}

/// Parse the document structure without extracting content.
///
/// Documents encrypted with the empty password are accepted; anything
/// stronger is reported as `Encrypted`.
pub fn sniff(data: &[u8]) -> Result<PdfInfo> {
    let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut was_encrypted = false;
    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        was_encrypted = true;
        debug!("Decrypted PDF with empty password");
    }

    let page_count = doc.get_pages().len() as u32;
    if page_count == 0 {
        return Err(PdfError::NoPages);
    }

    Ok(PdfInfo {
        page_count,
        was_encrypted,
    })
}

/// Extract embedded text from the whole document.
pub fn extract_embedded_text(data: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| PdfError::TextExtraction(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_rejects_garbage() {
        assert!(matches!(
            sniff(b"this is not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_extract_rejects_garbage() {
        assert!(extract_embedded_text(b"\x00\x01\x02garbage").is_err());
    }
}
