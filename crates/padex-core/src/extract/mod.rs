//! Passport field extraction pipeline.
//!
//! The orchestrator decides, per input MIME type, which stages run and in
//! what order: images go straight to the vision backend; PDFs run the
//! text-pattern phase first and fall back to rasterize-then-vision when
//! no name was recovered.

mod matcher;
mod patterns;
mod score;

pub use matcher::{
    is_metadata_token, is_valid_name, is_valid_passport_number, match_bytes, match_text,
    normalize_date, normalize_passport_number, TextMatch,
};
pub use patterns::{LABEL_STOPWORDS, METADATA_DENYLIST};
pub use score::{merge_vision_with_text_dates, presence_confidence};

use tracing::{debug, warn};

use padex_vision::{VisionBackend, VisionFields};

use crate::models::config::ExtractionConfig;
use crate::models::extraction::{ExtractionResult, FieldSet, TextEncoding};
use crate::pdf::{self, PageRasterizer};

/// Method tag for inputs no stage can handle.
pub const METHOD_UNSUPPORTED: &str = "unsupported";

/// The extraction pipeline with its injected capabilities.
///
/// Stateless apart from the static pattern tables; one instance can serve
/// any number of independent calls.
pub struct DocumentExtractor<R, V> {
    rasterizer: R,
    vision: V,
    config: ExtractionConfig,
}

impl<R: PageRasterizer, V: VisionBackend> DocumentExtractor<R, V> {
    pub fn new(rasterizer: R, vision: V) -> Self {
        Self {
            rasterizer,
            vision,
            config: ExtractionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Extract passport fields from a document of the given MIME type.
    ///
    /// Never fails: every stage error degrades to an empty or partial
    /// result whose `success` and `confidence` reflect what was
    /// recovered.
    pub async fn extract_from_document(&self, bytes: &[u8], mime: &str) -> ExtractionResult {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            return self.extract_from_image(bytes, &mime).await;
        }
        if mime == "application/pdf" {
            return self.extract_from_pdf(bytes).await;
        }

        warn!("Unsupported MIME type: {}", mime);
        ExtractionResult::failed(METHOD_UNSUPPORTED)
    }

    /// Extract from a PDF buffer.
    ///
    /// Fallback policy: the vision path runs iff the text phase recovered
    /// neither surname nor given names. Metadata-looking hits were
    /// already discarded by the matcher, so they fall through here too.
    /// Missing dates alone never trigger the fallback.
    pub async fn extract_from_pdf(&self, bytes: &[u8]) -> ExtractionResult {
        let text_result = self.best_text_candidate(bytes);

        if text_result.fields.has_name() {
            debug!(
                "Text phase recovered a name via {} (confidence {:.2})",
                text_result.extraction_method, text_result.confidence
            );
            return text_result;
        }
        if !self.config.enable_vision_fallback {
            return text_result;
        }

        let page = match self.rasterizer.rasterize_first_page(bytes).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Rasterization failed: {}", e);
                return text_result;
            }
        };

        let vision_fields = match self.vision.extract_fields(&page.png, "image/png").await {
            Ok(fields) => fields,
            Err(e) => {
                warn!("Vision extraction failed: {}", e);
                return text_result;
            }
        };

        let (fields, took_dates) = merge_vision_with_text_dates(
            sanitize_vision_fields(vision_fields),
            &text_result.fields,
        );
        let method = if took_dates {
            format!("{}+text-dates", self.vision.name())
        } else {
            self.vision.name().to_string()
        };

        ExtractionResult::from_fields(fields, method)
    }

    async fn extract_from_image(&self, bytes: &[u8], mime: &str) -> ExtractionResult {
        match self.vision.extract_fields(bytes, mime).await {
            Ok(fields) => {
                ExtractionResult::from_fields(sanitize_vision_fields(fields), self.vision.name())
            }
            Err(e) => {
                warn!("Vision extraction failed: {}", e);
                ExtractionResult::failed(self.vision.name())
            }
        }
    }

    /// Best-scoring candidate across embedded text and the raw decodings.
    fn best_text_candidate(&self, bytes: &[u8]) -> ExtractionResult {
        let mut best: Option<ExtractionResult> = None;

        match pdf::sniff(bytes) {
            Ok(info) => {
                debug!("PDF sniff: {} pages", info.page_count);
                match pdf::extract_embedded_text(bytes) {
                    Ok(text) if text.trim().len() >= self.config.min_text_length => {
                        let fields = match_text(&text);
                        consider(&mut best, ExtractionResult::from_fields(fields, "pdf-text"));
                    }
                    Ok(_) => debug!("Embedded text below threshold"),
                    Err(e) => debug!("Embedded text extraction failed: {}", e),
                }
            }
            Err(e) => debug!("PDF sniff failed: {}", e),
        }

        for encoding in TextEncoding::ALL {
            let matched = match_bytes(bytes, encoding);
            consider(
                &mut best,
                ExtractionResult::from_fields(
                    matched.fields,
                    format!("text-pattern-{}", encoding.label()),
                ),
            );
        }

        best.unwrap_or_else(|| ExtractionResult::failed("pdf-text"))
    }
}

fn consider(best: &mut Option<ExtractionResult>, candidate: ExtractionResult) {
    let replace = match best {
        Some(current) => candidate.confidence > current.confidence,
        None => true,
    };
    if replace {
        *best = Some(candidate);
    }
}

/// Vision replies pass through the same validation as the text path, so
/// metadata tokens and malformed values cannot reenter through the model.
fn sanitize_vision_fields(fields: VisionFields) -> FieldSet {
    let mut out = FieldSet {
        surname: fields.surname.trim().to_string(),
        given_names: fields.given_names.trim().to_string(),
        passport_number: fields.passport_number,
        nationality: fields.nationality.trim().to_string(),
        date_of_birth: fields.date_of_birth,
        date_of_issue: fields.date_of_issue,
        date_of_expiry: fields.date_of_expiry,
    };

    if !is_valid_name(&out.surname) {
        out.surname.clear();
    }
    if !is_valid_name(&out.given_names) {
        out.given_names.clear();
    }
    out.passport_number = normalize_passport_number(&out.passport_number).unwrap_or_default();
    if is_metadata_token(&out.nationality) {
        out.nationality.clear();
    }
    for date in [
        &mut out.date_of_birth,
        &mut out.date_of_issue,
        &mut out.date_of_expiry,
    ] {
        *date = normalize_date(date).unwrap_or_default();
    }

    out
}
