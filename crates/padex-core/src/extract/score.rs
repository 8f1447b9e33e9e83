//! Presence-based confidence scoring and result merging.

use crate::models::extraction::FieldSet;

const SURNAME_WEIGHT: f32 = 0.3;
const GIVEN_NAMES_WEIGHT: f32 = 0.3;
const PASSPORT_NUMBER_WEIGHT: f32 = 0.4;

/// Presence heuristic over the three key fields.
///
/// A field counts simply by being non-empty; this is not an accuracy
/// estimate. Kept behind one function so the weighting can change without
/// touching orchestration.
pub fn presence_confidence(fields: &FieldSet) -> f32 {
    let mut score = 0.0;
    if !fields.surname.is_empty() {
        score += SURNAME_WEIGHT;
    }
    if !fields.given_names.is_empty() {
        score += GIVEN_NAMES_WEIGHT;
    }
    if !fields.passport_number.is_empty() {
        score += PASSPORT_NUMBER_WEIGHT;
    }
    score.min(1.0)
}

/// Fill date fields missing from a vision result with dates recovered by
/// the text phase. Returns the merged set and whether anything was taken
/// from the text side.
pub fn merge_vision_with_text_dates(mut vision: FieldSet, text: &FieldSet) -> (FieldSet, bool) {
    let mut merged = false;

    if vision.date_of_birth.is_empty() && !text.date_of_birth.is_empty() {
        vision.date_of_birth = text.date_of_birth.clone();
        merged = true;
    }
    if vision.date_of_issue.is_empty() && !text.date_of_issue.is_empty() {
        vision.date_of_issue = text.date_of_issue.clone();
        merged = true;
    }
    if vision.date_of_expiry.is_empty() && !text.date_of_expiry.is_empty() {
        vision.date_of_expiry = text.date_of_expiry.clone();
        merged = true;
    }

    (vision, merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(surname: &str, given: &str, number: &str) -> FieldSet {
        FieldSet {
            surname: surname.to_string(),
            given_names: given.to_string(),
            passport_number: number.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_confidence_is_exactly_the_presence_sum() {
        let cases = [
            ("", "", ""),
            ("KOWALSKA", "", ""),
            ("", "ANNA", ""),
            ("", "", "EH1234567"),
            ("KOWALSKA", "ANNA", ""),
            ("KOWALSKA", "", "EH1234567"),
            ("KOWALSKA", "ANNA", "EH1234567"),
        ];

        for (surname, given, number) in cases {
            let f = fields(surname, given, number);
            let expected: f32 = (if surname.is_empty() { 0.0_f32 } else { 0.3_f32 }
                + if given.is_empty() { 0.0_f32 } else { 0.3_f32 }
                + if number.is_empty() { 0.0_f32 } else { 0.4_f32 })
            .min(1.0_f32);
            assert_eq!(presence_confidence(&f), expected);
        }
    }

    #[test]
    fn test_confidence_full_set_is_one() {
        assert_eq!(
            presence_confidence(&fields("KOWALSKA", "ANNA", "EH1234567")),
            1.0
        );
    }

    #[test]
    fn test_merge_takes_only_missing_dates() {
        let vision = FieldSet {
            surname: "KOWALSKA".to_string(),
            date_of_birth: "1985-04-12".to_string(),
            ..Default::default()
        };
        let text = FieldSet {
            date_of_birth: "1990-01-01".to_string(),
            date_of_expiry: "2030-04-15".to_string(),
            ..Default::default()
        };

        let (merged, took_dates) = merge_vision_with_text_dates(vision, &text);
        assert!(took_dates);
        // The vision date wins; only the gap is filled.
        assert_eq!(merged.date_of_birth, "1985-04-12");
        assert_eq!(merged.date_of_expiry, "2030-04-15");
    }

    #[test]
    fn test_merge_reports_no_change() {
        let vision = FieldSet {
            date_of_birth: "1985-04-12".to_string(),
            ..Default::default()
        };
        let (_, took_dates) = merge_vision_with_text_dates(vision, &FieldSet::default());
        assert!(!took_dates);
    }
}
