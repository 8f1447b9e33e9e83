//! Vision backend implementations.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::VisionError;
use crate::Result;

/// Passport fields as reported by a vision backend.
///
/// All values are strings as transcribed by the model; an empty string
/// means the field was not legible in the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionFields {
    pub surname: String,
    pub given_names: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub date_of_issue: String,
    pub date_of_expiry: String,
}

impl VisionFields {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.surname.is_empty()
            && self.given_names.is_empty()
            && self.passport_number.is_empty()
            && self.nationality.is_empty()
            && self.date_of_birth.is_empty()
            && self.date_of_issue.is_empty()
            && self.date_of_expiry.is_empty()
    }
}

/// Trait for vision-OCR backends.
///
/// This trait abstracts over multimodal APIs that read passport data
/// pages from images, so the extraction pipeline can run without network
/// access in tests and offline modes.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Read passport fields from an encoded image.
    ///
    /// `mime` is the image MIME type used for the data URL
    /// (e.g. `image/png`).
    async fn extract_fields(&self, image: &[u8], mime: &str) -> Result<VisionFields>;

    /// Short backend name used for logs and method tags.
    fn name(&self) -> &str;
}

/// Backend that refuses every request.
///
/// Used for text-only runs; keeps the pipeline wiring identical while
/// guaranteeing no network call is made.
pub struct DisabledBackend;

#[async_trait]
impl VisionBackend for DisabledBackend {
    async fn extract_fields(&self, _image: &[u8], _mime: &str) -> Result<VisionFields> {
        Err(VisionError::Disabled)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}
