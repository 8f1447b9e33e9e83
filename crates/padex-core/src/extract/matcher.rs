//! Text-pattern matcher for passport data pages.
//!
//! Pure functions: identical input always yields identical output, and
//! nothing here touches the filesystem or network.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::*;
use super::score::presence_confidence;
use crate::models::extraction::{FieldSet, TextEncoding};

/// Outcome of matching one decoded buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub fields: FieldSet,
    pub confidence: f32,
    pub encoding: TextEncoding,
}

/// Run the pattern bank against a byte buffer under one decoding.
pub fn match_bytes(bytes: &[u8], encoding: TextEncoding) -> TextMatch {
    let text = encoding.decode(bytes);
    let fields = match_text(&text);
    TextMatch {
        confidence: presence_confidence(&fields),
        fields,
        encoding,
    }
}

/// Run the pattern bank against already-decoded text.
///
/// The MRZ is tried first; printed labels fill whatever it left empty.
pub fn match_text(text: &str) -> FieldSet {
    let mut fields = FieldSet::default();
    apply_mrz(text, &mut fields);

    if fields.surname.is_empty() {
        fields.surname = first_valid(text, &SURNAME_PATTERNS, is_valid_name);
    }
    if fields.given_names.is_empty() {
        fields.given_names = first_valid(text, &GIVEN_NAMES_PATTERNS, is_valid_name);
    }
    if fields.passport_number.is_empty() {
        if let Some(number) =
            first_valid_opt(text, &PASSPORT_NUMBER_PATTERNS, normalize_passport_number)
        {
            fields.passport_number = number;
        }
    }
    if fields.nationality.is_empty() {
        fields.nationality = first_valid(text, &NATIONALITY_PATTERNS, is_valid_nationality);
    }
    if fields.date_of_birth.is_empty() {
        fields.date_of_birth = first_date(text, &DATE_OF_BIRTH_PATTERNS);
    }
    if fields.date_of_issue.is_empty() {
        fields.date_of_issue = first_date(text, &DATE_OF_ISSUE_PATTERNS);
    }
    if fields.date_of_expiry.is_empty() {
        fields.date_of_expiry = first_date(text, &DATE_OF_EXPIRY_PATTERNS);
    }

    fields
}

fn apply_mrz(text: &str, fields: &mut FieldSet) {
    if let Some(caps) = MRZ_NAME_LINE.captures(text) {
        let surname = mrz_name(&caps[2]);
        let given = mrz_name(&caps[3]);
        if is_valid_name(&surname) {
            fields.surname = surname;
        }
        if is_valid_name(&given) {
            fields.given_names = given;
        }
    }

    if let Some(caps) = MRZ_DATA_LINE.captures(text) {
        if let Some(number) = normalize_passport_number(&caps[1]) {
            fields.passport_number = number;
        }
        fields.nationality = caps[2].to_string();
        if let Some(dob) = mrz_date(&caps[3], false) {
            fields.date_of_birth = dob;
        }
        if let Some(expiry) = mrz_date(&caps[4], true) {
            fields.date_of_expiry = expiry;
        }
    }
}

/// MRZ name fields use `<` as the separator between name parts.
fn mrz_name(raw: &str) -> String {
    raw.split('<')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_valid(text: &str, patterns: &[Regex], accept: fn(&str) -> bool) -> String {
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            let candidate = normalize_ws(&caps[1]);
            if accept(&candidate) {
                return candidate;
            }
        }
    }
    String::new()
}

fn first_valid_opt(
    text: &str,
    patterns: &[Regex],
    normalize: fn(&str) -> Option<String>,
) -> Option<String> {
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            if let Some(value) = normalize(&caps[1]) {
                return Some(value);
            }
        }
    }
    None
}

fn first_date(text: &str, patterns: &[Regex]) -> String {
    for pattern in patterns {
        for caps in pattern.captures_iter(text) {
            if let Some(iso) = normalize_date(&caps[1]) {
                return iso;
            }
        }
    }
    String::new()
}

/// Accept a candidate personal name.
///
/// Rejects metadata tokens and captures that are really a neighbouring
/// printed label.
pub fn is_valid_name(value: &str) -> bool {
    let value = value.trim();
    let len = value.chars().count();
    if !(2..=40).contains(&len) {
        return false;
    }
    if !value
        .chars()
        .all(|c| c.is_alphabetic() || c == ' ' || c == '-' || c == '\'')
    {
        return false;
    }
    if is_metadata_token(value) {
        return false;
    }
    let first_word = value
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_uppercase();
    !LABEL_STOPWORDS.contains(&first_word.as_str())
}

/// True when the trimmed value is a known PDF metadata token.
pub fn is_metadata_token(value: &str) -> bool {
    let upper = value.trim().to_uppercase();
    METADATA_DENYLIST.contains(&upper.as_str())
}

/// Accept and canonicalize a passport number: strip spaces, uppercase,
/// 6..=10 alphanumeric with at least one digit.
pub fn normalize_passport_number(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !(6..=10).contains(&compact.len()) {
        return None;
    }
    if !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    if !compact.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(compact)
}

/// Shorthand used by callers that only need a yes/no answer.
pub fn is_valid_passport_number(value: &str) -> bool {
    normalize_passport_number(value).is_some()
}

fn is_valid_nationality(value: &str) -> bool {
    let value = value.trim();
    let len = value.chars().count();
    if !(3..=30).contains(&len) {
        return false;
    }
    if !value
        .chars()
        .all(|c| c.is_alphabetic() || c == '/' || c == ' ')
    {
        return false;
    }
    !is_metadata_token(value)
}

/// Normalize a matched date string to ISO `yyyy-mm-dd`.
///
/// Returns `None` for anything chrono rejects, so impossible dates never
/// reach a result.
pub fn normalize_date(raw: &str) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(caps) = DATE_YMD.captures(value) {
        return iso_date(
            caps[1].parse().ok()?,
            caps[2].parse().ok()?,
            caps[3].parse().ok()?,
        );
    }
    if let Some(caps) = DATE_DMY.captures(value) {
        return iso_date(
            parse_year(&caps[3]),
            caps[2].parse().ok()?,
            caps[1].parse().ok()?,
        );
    }
    if let Some(caps) = DATE_MONTH_NAME.captures(value) {
        let month = month_to_number(&caps[2])?;
        return iso_date(caps[3].parse().ok()?, month, caps[1].parse().ok()?);
    }
    None
}

fn iso_date(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format("%Y-%m-%d").to_string())
}

/// MRZ dates are YYMMDD. Birth dates pivot at 30 (31..=99 -> 1900s);
/// expiry dates are always in the 2000s.
fn mrz_date(raw: &str, future: bool) -> Option<String> {
    if raw.len() != 6 {
        return None;
    }
    let yy: i32 = raw[0..2].parse().ok()?;
    let month: u32 = raw[2..4].parse().ok()?;
    let day: u32 = raw[4..6].parse().ok()?;
    let year = if future {
        2000 + yy
    } else if yy <= 30 {
        2000 + yy
    } else {
        1900 + yy
    };
    iso_date(year, month, day)
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let lower = month.to_lowercase();
    // Polish month names appear in the genitive on printed dates.
    let polish = match lower.as_str() {
        "stycznia" => 1,
        "lutego" => 2,
        "marca" => 3,
        "kwietnia" => 4,
        "maja" => 5,
        "czerwca" => 6,
        "lipca" => 7,
        "sierpnia" => 8,
        "września" => 9,
        "października" => 10,
        "listopada" => 11,
        "grudnia" => 12,
        _ => 0,
    };
    if polish != 0 {
        return Some(polish);
    }

    let english = match lower.get(0..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(english)
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_labeled_surname_scores_at_least_name_weight() {
        let text = b"SURNAME: KOWALSKA\nsome other content";
        let result = match_bytes(text, TextEncoding::Utf8);
        assert_eq!(result.fields.surname, "KOWALSKA");
        assert!(result.confidence >= 0.3);
    }

    #[test]
    fn test_full_data_page() {
        let text = b"Nazwisko / Surname: KOWALSKA\n\
                     Imiona / Given names: ANNA MARIA\n\
                     Passport No. EH 1234567\n\
                     Nationality: POLISH\n\
                     Date of birth: 12.04.1985\n\
                     Date of issue: 15.04.2020\n\
                     Date of expiry: 15.04.2030\n";
        let result = match_bytes(text, TextEncoding::Utf8);
        assert_eq!(result.fields.surname, "KOWALSKA");
        assert_eq!(result.fields.given_names, "ANNA MARIA");
        assert_eq!(result.fields.passport_number, "EH1234567");
        assert_eq!(result.fields.nationality, "POLISH");
        assert_eq!(result.fields.date_of_birth, "1985-04-12");
        assert_eq!(result.fields.date_of_issue, "2020-04-15");
        assert_eq!(result.fields.date_of_expiry, "2030-04-15");
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn test_latin1_buffer() {
        let mut bytes = b"NAZWISKO: G".to_vec();
        bytes.push(0xD3); // Ó in Latin-1
        bytes.extend_from_slice(b"RSKA\n");
        let result = match_bytes(&bytes, TextEncoding::Latin1);
        assert_eq!(result.fields.surname, "GÓRSKA");
    }

    #[test]
    fn test_mrz_lines() {
        let text = "P<POLKOWALSKA<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<<\n\
                    EH12345674POL8504122F3004155<<<<<<<<<<<<<<04";
        let fields = match_text(text);
        assert_eq!(fields.surname, "KOWALSKA");
        assert_eq!(fields.given_names, "ANNA MARIA");
        assert_eq!(fields.passport_number, "EH1234567");
        assert_eq!(fields.nationality, "POL");
        assert_eq!(fields.date_of_birth, "1985-04-12");
        assert_eq!(fields.date_of_expiry, "2030-04-15");
    }

    #[test]
    fn test_metadata_tokens_rejected() {
        for token in ["XMP", "RDF", "RGB"] {
            let text = format!("SURNAME: {token}\n");
            let fields = match_text(&text);
            assert!(fields.surname.is_empty(), "accepted {token}");
        }
    }

    #[test]
    fn test_label_words_rejected_as_names() {
        let fields = match_text("1. Surname 2. Given names\n");
        assert!(fields.surname.is_empty());
    }

    #[test]
    fn test_idempotent() {
        let bytes = b"SURNAME: NOWAK\nPassport No. AB1234567";
        let first = match_bytes(bytes, TextEncoding::Utf8);
        let second = match_bytes(bytes, TextEncoding::Utf8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_normalize_date_formats() {
        assert_eq!(normalize_date("12.04.1985").as_deref(), Some("1985-04-12"));
        assert_eq!(normalize_date("1985-04-12").as_deref(), Some("1985-04-12"));
        assert_eq!(normalize_date("12 APR 1985").as_deref(), Some("1985-04-12"));
        assert_eq!(
            normalize_date("12 kwietnia 1985").as_deref(),
            Some("1985-04-12")
        );
        assert_eq!(normalize_date("15.04.24").as_deref(), Some("2024-04-15"));
        assert_eq!(normalize_date("31.02.1985"), None);
        assert_eq!(normalize_date("garbage"), None);
    }

    #[test]
    fn test_normalize_passport_number() {
        assert_eq!(
            normalize_passport_number("EH 1234567").as_deref(),
            Some("EH1234567")
        );
        assert_eq!(
            normalize_passport_number("ab1234567").as_deref(),
            Some("AB1234567")
        );
        assert_eq!(normalize_passport_number("ABCDEFG"), None); // no digit
        assert_eq!(normalize_passport_number("12345"), None); // too short
        assert_eq!(normalize_passport_number("12345678901"), None); // too long
    }

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("KOWALSKA"));
        assert!(is_valid_name("ANNA MARIA"));
        assert!(is_valid_name("O'BRIEN-NOWAK"));
        assert!(!is_valid_name("X"));
        assert!(!is_valid_name("XMP"));
        assert!(!is_valid_name("AB12"));
        assert!(!is_valid_name("GIVEN NAMES"));
    }
}
