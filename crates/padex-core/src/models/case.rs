//! Case document models for the readiness rules engine.

use serde::{Deserialize, Serialize};

/// Kinds of documents a citizenship case can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Current passport of the applicant.
    Passport,
    /// Applicant's birth certificate.
    BirthCertificate,
    /// A Polish document proving the ancestor's citizenship.
    AncestorDocument,
    /// Marriage certificate covering a name change in the lineage.
    MarriageCertificate,
    /// Court or administrative name-change decree.
    NameChangeDecree,
    /// Supporting archival record.
    ArchivalRecord,
}

impl DocumentKind {
    /// Human-readable label used in warnings.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Passport => "Passport",
            DocumentKind::BirthCertificate => "Birth certificate",
            DocumentKind::AncestorDocument => "Ancestor document",
            DocumentKind::MarriageCertificate => "Marriage certificate",
            DocumentKind::NameChangeDecree => "Name change decree",
            DocumentKind::ArchivalRecord => "Archival record",
        }
    }
}

/// Traffic-light readiness status of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CaseStatus {
    Green,
    Amber,
    Red,
}

/// Outcome of a completeness assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseAssessment {
    pub status: CaseStatus,

    /// Whether the case may be submitted. Red blocks submission unless a
    /// supervisor override is applied.
    pub can_proceed: bool,

    /// Human-readable warnings, including any override audit lines.
    pub warnings: Vec<String>,

    pub missing_required: Vec<DocumentKind>,
    pub missing_optional: Vec<DocumentKind>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&CaseStatus::Green).unwrap(),
            "\"GREEN\""
        );
        assert_eq!(serde_json::to_string(&CaseStatus::Red).unwrap(), "\"RED\"");
    }

    #[test]
    fn test_document_kind_round_trip() {
        let kinds: Vec<DocumentKind> =
            serde_json::from_str(r#"["passport", "birth_certificate", "ancestor_document"]"#)
                .unwrap();
        assert_eq!(
            kinds,
            vec![
                DocumentKind::Passport,
                DocumentKind::BirthCertificate,
                DocumentKind::AncestorDocument,
            ]
        );
    }
}
