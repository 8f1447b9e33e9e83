//! Case-readiness rules for citizenship-case submission.
//!
//! Pure functions over in-memory document lists: a traffic-light
//! completeness status with human-readable warnings, and a supervisor
//! override that force-enables submission while keeping the audit trail.

use crate::models::case::{CaseAssessment, CaseStatus, DocumentKind};

/// Document kinds every case must carry before submission.
pub const REQUIRED_DOCUMENTS: &[DocumentKind] = &[
    DocumentKind::Passport,
    DocumentKind::BirthCertificate,
    DocumentKind::AncestorDocument,
];

/// Document kinds that strengthen a case but do not block it.
pub const OPTIONAL_DOCUMENTS: &[DocumentKind] = &[
    DocumentKind::MarriageCertificate,
    DocumentKind::NameChangeDecree,
    DocumentKind::ArchivalRecord,
];

/// Assess a case's document completeness.
///
/// Red when any required document is missing, amber when only optional
/// ones are, green otherwise. Duplicate uploads of a kind count once.
pub fn assess_case(uploaded: &[DocumentKind]) -> CaseAssessment {
    let missing_required: Vec<DocumentKind> = REQUIRED_DOCUMENTS
        .iter()
        .copied()
        .filter(|kind| !uploaded.contains(kind))
        .collect();
    let missing_optional: Vec<DocumentKind> = OPTIONAL_DOCUMENTS
        .iter()
        .copied()
        .filter(|kind| !uploaded.contains(kind))
        .collect();

    let status = if !missing_required.is_empty() {
        CaseStatus::Red
    } else if !missing_optional.is_empty() {
        CaseStatus::Amber
    } else {
        CaseStatus::Green
    };

    let mut warnings = Vec::with_capacity(missing_required.len() + missing_optional.len());
    for kind in &missing_required {
        warnings.push(format!("Required document missing: {}", kind.label()));
    }
    for kind in &missing_optional {
        warnings.push(format!("Optional document missing: {}", kind.label()));
    }

    CaseAssessment {
        status,
        can_proceed: status != CaseStatus::Red,
        warnings,
        missing_required,
        missing_optional,
    }
}

/// Apply a supervisor override to an assessment.
///
/// Forces `can_proceed`, keeps every existing warning, and appends one
/// audit line recording the reason and the acting supervisor. The status
/// itself is left as computed, so the traffic light keeps reporting
/// document reality.
pub fn apply_override(assessment: &CaseAssessment, reason: &str, actor: &str) -> CaseAssessment {
    let mut overridden = assessment.clone();
    overridden.can_proceed = true;
    overridden
        .warnings
        .push(format!("OVERRIDE APPLIED: {reason} (by {actor})"));
    overridden
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_case_is_red_with_one_warning_per_required_kind() {
        let assessment = assess_case(&[]);

        assert_eq!(assessment.status, CaseStatus::Red);
        assert!(!assessment.can_proceed);

        let required_warnings: Vec<&String> = assessment
            .warnings
            .iter()
            .filter(|w| w.starts_with("Required document missing"))
            .collect();
        assert_eq!(required_warnings.len(), REQUIRED_DOCUMENTS.len());
        assert_eq!(REQUIRED_DOCUMENTS.len(), 3);
    }

    #[test]
    fn test_all_documents_is_green() {
        let uploaded = [
            DocumentKind::Passport,
            DocumentKind::BirthCertificate,
            DocumentKind::AncestorDocument,
            DocumentKind::MarriageCertificate,
            DocumentKind::NameChangeDecree,
            DocumentKind::ArchivalRecord,
        ];
        let assessment = assess_case(&uploaded);

        assert_eq!(assessment.status, CaseStatus::Green);
        assert!(assessment.can_proceed);
        assert!(assessment.warnings.is_empty());
    }

    #[test]
    fn test_required_only_is_amber_and_can_proceed() {
        let uploaded = [
            DocumentKind::Passport,
            DocumentKind::BirthCertificate,
            DocumentKind::AncestorDocument,
        ];
        let assessment = assess_case(&uploaded);

        assert_eq!(assessment.status, CaseStatus::Amber);
        assert!(assessment.can_proceed);
        assert_eq!(assessment.warnings.len(), OPTIONAL_DOCUMENTS.len());
        assert!(assessment
            .warnings
            .iter()
            .all(|w| w.starts_with("Optional document missing")));
    }

    #[test]
    fn test_duplicates_count_once() {
        let uploaded = [DocumentKind::Passport, DocumentKind::Passport];
        let assessment = assess_case(&uploaded);

        assert_eq!(assessment.status, CaseStatus::Red);
        assert_eq!(assessment.missing_required.len(), 2);
    }

    #[test]
    fn test_override_preserves_warnings_and_appends_audit_line() {
        let assessment = assess_case(&[]);
        let original_warnings = assessment.warnings.clone();

        let overridden = apply_override(&assessment, "archival copy accepted", "m.wisniewska");

        assert!(overridden.can_proceed);
        assert_eq!(overridden.status, CaseStatus::Red);
        assert_eq!(overridden.warnings.len(), original_warnings.len() + 1);
        for warning in &original_warnings {
            assert!(overridden.warnings.contains(warning));
        }
        assert_eq!(
            overridden.warnings.last().unwrap(),
            "OVERRIDE APPLIED: archival copy accepted (by m.wisniewska)"
        );
    }

    #[test]
    fn test_override_does_not_mutate_input() {
        let assessment = assess_case(&[]);
        let original_len = assessment.warnings.len();
        let _ = apply_override(&assessment, "reason", "actor");
        assert!(!assessment.can_proceed);
        assert_eq!(assessment.warnings.len(), original_len);
    }
}
