//! Extraction result models.

use serde::{Deserialize, Serialize};

use crate::extract::presence_confidence;

/// Decodings the raw-buffer text matcher runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Latin1,
    Ascii,
}

impl TextEncoding {
    /// All supported decodings, in the order the text phase tries them.
    pub const ALL: [TextEncoding; 3] = [TextEncoding::Utf8, TextEncoding::Latin1, TextEncoding::Ascii];

    /// Short label used in method tags.
    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Ascii => "ascii",
        }
    }

    /// Decode a byte buffer under this encoding.
    ///
    /// Latin-1 maps every byte to the corresponding code point; the ASCII
    /// decoding drops non-ASCII bytes instead of replacing them.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            TextEncoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
            TextEncoding::Ascii => bytes
                .iter()
                .filter(|b| b.is_ascii())
                .map(|&b| b as char)
                .collect(),
        }
    }
}

/// The passport fields a single extraction can recover.
///
/// Dates are ISO `yyyy-mm-dd` once normalized; an empty string means the
/// field was not recovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSet {
    pub surname: String,
    pub given_names: String,
    pub passport_number: String,
    pub nationality: String,
    pub date_of_birth: String,
    pub date_of_issue: String,
    pub date_of_expiry: String,
}

impl FieldSet {
    /// True when surname or given names was recovered.
    pub fn has_name(&self) -> bool {
        !self.surname.is_empty() || !self.given_names.is_empty()
    }

    /// True when any date field was recovered.
    pub fn has_any_date(&self) -> bool {
        !self.date_of_birth.is_empty()
            || !self.date_of_issue.is_empty()
            || !self.date_of_expiry.is_empty()
    }
}

/// Result of one extraction call.
///
/// Immutable value; the caller decides what to persist. `confidence` is a
/// presence heuristic over the three key fields, not an accuracy estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub success: bool,

    #[serde(flatten)]
    pub fields: FieldSet,

    /// Which stage produced the fields (e.g. `pdf-text`,
    /// `text-pattern-latin1`, `vision-ocr`, `vision-ocr+text-dates`).
    pub extraction_method: String,

    pub confidence: f32,
}

impl ExtractionResult {
    /// Build a scored result from recovered fields.
    pub fn from_fields(fields: FieldSet, method: impl Into<String>) -> Self {
        let confidence = presence_confidence(&fields);
        Self {
            success: confidence > 0.0,
            fields,
            extraction_method: method.into(),
            confidence,
        }
    }

    /// An empty, failed result tagged with the stage that gave up.
    pub fn failed(method: impl Into<String>) -> Self {
        Self {
            success: false,
            fields: FieldSet::default(),
            extraction_method: method.into(),
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_latin1_decode_preserves_high_bytes() {
        // "GÓRSKA" with Ó as the Latin-1 byte 0xD3.
        let bytes = [b'G', 0xD3, b'R', b'S', b'K', b'A'];
        assert_eq!(TextEncoding::Latin1.decode(&bytes), "GÓRSKA");
    }

    #[test]
    fn test_ascii_decode_drops_high_bytes() {
        let bytes = [b'G', 0xD3, b'R'];
        assert_eq!(TextEncoding::Ascii.decode(&bytes), "GR");
    }

    #[test]
    fn test_result_serializes_flat_camel_case() {
        let result = ExtractionResult::from_fields(
            FieldSet {
                surname: "KOWALSKA".to_string(),
                given_names: "ANNA".to_string(),
                ..Default::default()
            },
            "pdf-text",
        );

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["surname"], "KOWALSKA");
        assert_eq!(json["givenNames"], "ANNA");
        assert_eq!(json["extractionMethod"], "pdf-text");
        assert_eq!(json["success"], true);
    }

    #[test]
    fn test_failed_result_is_empty() {
        let result = ExtractionResult::failed("unsupported");
        assert!(!result.success);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.fields, FieldSet::default());
    }
}
