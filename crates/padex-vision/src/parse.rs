//! Permissive parsing of vision model replies.

use serde_json::Value;

use crate::backend::VisionFields;

/// Extract a field record from a free-text model reply.
///
/// Accepts a raw JSON object, a fenced ```json block, or the first
/// balanced `{...}` span. Anything else yields an empty record.
pub fn parse_reply(reply: &str) -> VisionFields {
    for candidate in json_candidates(reply) {
        if let Ok(value) = serde_json::from_str::<Value>(&candidate) {
            if value.is_object() {
                return fields_from_value(&value);
            }
        }
    }
    VisionFields::default()
}

fn json_candidates(reply: &str) -> Vec<String> {
    let trimmed = reply.trim();
    let mut candidates = vec![trimmed.to_string()];
    if let Some(block) = fenced_block(trimmed) {
        candidates.push(block);
    }
    if let Some(span) = balanced_object(trimmed) {
        candidates.push(span);
    }
    candidates
}

fn fenced_block(text: &str) -> Option<String> {
    let start = text.find("```")?;
    let after = &text[start + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let end = after.find("```")?;
    Some(after[..end].trim().to_string())
}

fn balanced_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    for (offset, c) in text[start..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(text[start..start + offset + 1].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn fields_from_value(value: &Value) -> VisionFields {
    VisionFields {
        surname: string_field(value, &["surname", "lastName", "last_name"]),
        given_names: string_field(
            value,
            &["given_names", "givenNames", "first_name", "firstName"],
        ),
        passport_number: string_field(
            value,
            &[
                "passport_number",
                "passportNumber",
                "document_number",
                "documentNumber",
            ],
        ),
        nationality: string_field(value, &["nationality"]),
        date_of_birth: string_field(value, &["date_of_birth", "dateOfBirth", "birth_date"]),
        date_of_issue: string_field(value, &["date_of_issue", "dateOfIssue", "issue_date"]),
        date_of_expiry: string_field(value, &["date_of_expiry", "dateOfExpiry", "expiry_date"]),
    }
}

/// First usable string among the aliased keys. Placeholder replies
/// ("null", "n/a", "unknown") count as missing.
fn string_field(value: &Value, keys: &[&str]) -> String {
    for key in keys {
        match value.get(key) {
            Some(Value::String(s)) => {
                let s = s.trim();
                let lower = s.to_lowercase();
                if !s.is_empty() && lower != "null" && lower != "n/a" && lower != "unknown" {
                    return s.to_string();
                }
            }
            Some(Value::Number(n)) => return n.to_string(),
            _ => {}
        }
    }
    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_raw_json() {
        let reply = r#"{"surname": "KOWALSKA", "given_names": "ANNA MARIA", "passport_number": "EH1234567", "nationality": "POLISH", "date_of_birth": "1985-04-12", "date_of_issue": "", "date_of_expiry": ""}"#;
        let fields = parse_reply(reply);
        assert_eq!(fields.surname, "KOWALSKA");
        assert_eq!(fields.given_names, "ANNA MARIA");
        assert_eq!(fields.passport_number, "EH1234567");
    }

    #[test]
    fn test_parse_fenced_block() {
        let reply = "Here is the extracted data:\n```json\n{\"surname\": \"NOWAK\", \"passportNumber\": \"AB9876543\"}\n```\nLet me know if you need more.";
        let fields = parse_reply(reply);
        assert_eq!(fields.surname, "NOWAK");
        assert_eq!(fields.passport_number, "AB9876543");
    }

    #[test]
    fn test_parse_embedded_object() {
        let reply = "The document shows: {\"surname\": \"WISNIEWSKI\"} as far as I can tell.";
        let fields = parse_reply(reply);
        assert_eq!(fields.surname, "WISNIEWSKI");
    }

    #[test]
    fn test_parse_garbage_yields_empty() {
        assert!(parse_reply("I cannot read this document.").is_empty());
        assert!(parse_reply("").is_empty());
    }

    #[test]
    fn test_parse_camel_case_aliases() {
        let reply = r#"{"lastName": "ZIELINSKA", "givenNames": "EWA", "documentNumber": "ZS0011223", "dateOfBirth": "1990-01-31"}"#;
        let fields = parse_reply(reply);
        assert_eq!(fields.surname, "ZIELINSKA");
        assert_eq!(fields.given_names, "EWA");
        assert_eq!(fields.passport_number, "ZS0011223");
        assert_eq!(fields.date_of_birth, "1990-01-31");
    }

    #[test]
    fn test_parse_placeholders_count_as_missing() {
        let reply = r#"{"surname": "null", "given_names": "n/a", "passport_number": "unknown"}"#;
        assert!(parse_reply(reply).is_empty());
    }
}
