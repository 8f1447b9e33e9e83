//! Regex pattern bank for passport data pages.
//!
//! Patterns are ordered by priority per field; the matcher takes the first
//! hit that survives validation. Labels cover English, Polish, and French
//! printed conventions plus the ICAO MRZ lines.

use lazy_static::lazy_static;
use regex::Regex;

/// Tokens that show up in PDF metadata streams and must never be accepted
/// as personal data.
pub const METADATA_DENYLIST: &[&str] = &[
    "XMP", "RDF", "RGB", "ICC", "EXIF", "XML", "PDF", "ADOBE", "OBJ", "TYPE", "FONT", "SRGB",
    "FLATE", "ENDOBJ", "ENDSTREAM",
];

/// Printed label words. A candidate name starting with one of these is a
/// mis-capture of the neighbouring label, not a value.
pub const LABEL_STOPWORDS: &[&str] = &[
    "SURNAME", "NAME", "NAMES", "GIVEN", "PASSPORT", "NATIONALITY", "DATE", "BIRTH", "ISSUE",
    "EXPIRY", "NAZWISKO", "IMIONA", "OBYWATELSTWO", "NOM", "PRENOM", "PRENOMS", "DOCUMENT",
];

// Date value shapes accepted by labeled date patterns. Normalization to
// ISO happens in the matcher, not here.
const DATE_VALUE: &str = r"\d{1,2}[./\- ]\d{1,2}[./\- ]\d{2,4}|\d{4}[./\-]\d{1,2}[./\-]\d{1,2}|\d{1,2}\s+\p{L}{3,12}\.?\s+\d{4}";

fn labeled_date(labels: &str) -> Regex {
    Regex::new(&format!(r"(?i)(?:{labels})[\s:./]*((?:{DATE_VALUE}))")).unwrap()
}

lazy_static! {
    // ICAO MRZ, TD3. Line 1 carries the names, line 2 the document
    // number, nationality, birth date, and expiry date.
    pub static ref MRZ_NAME_LINE: Regex = Regex::new(
        r"P[A-Z<]([A-Z]{3})([A-Z]+(?:<[A-Z]+)*)<<([A-Z]+(?:<[A-Z]+)*)"
    ).unwrap();

    pub static ref MRZ_DATA_LINE: Regex = Regex::new(
        r"([A-Z]{1,2}[0-9]{7,8})[0-9]([A-Z]{3})([0-9]{6})[0-9][MF<X]([0-9]{6})[0-9]"
    ).unwrap();

    pub static ref SURNAME_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:surname\s*/\s*nom|nazwisko(?:\s*/\s*surname)?|surname)[\s:/.()\d]*([\p{L}][\p{L} '\-]{1,39})").unwrap(),
        Regex::new(r"(?i)family\s+name[\s:/.()\d]*([\p{L}][\p{L} '\-]{1,39})").unwrap(),
    ];

    // Bilingual labels must be matched as a whole, or the second language
    // gets captured as the value.
    pub static ref GIVEN_NAMES_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:given\s+names?(?:\s*/\s*pr[ée]noms?)?|imiona(?:\s*/\s*given\s+names?)?|imi[ęe](?:\s*/\s*given\s+names?)?)[\s:/.()\d]*([\p{L}][\p{L} '\-]{1,39})").unwrap(),
        Regex::new(r"(?i)(?:first\s+names?|forenames?)[\s:/.()\d]*([\p{L}][\p{L} '\-]{1,39})").unwrap(),
    ];

    pub static ref PASSPORT_NUMBER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:passport\s+(?:no|number)\.?(?:\s*/\s*n[o0]\.?\s*du\s+passeport)?|nr\s+paszportu|numer\s+paszportu|seria\s+i\s+numer)[\s:/.()]*([A-Za-z]{1,2}\s?[0-9]{6,8})").unwrap(),
        Regex::new(r"(?i)document\s+(?:no|number)\.?[\s:/.()]*([A-Za-z0-9]{6,10})").unwrap(),
    ];

    pub static ref NATIONALITY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)(?:nationality(?:\s*/\s*nationalit[ée])?|obywatelstwo(?:\s*/\s*nationality)?)[\s:/.()\d]*([\p{L}][\p{L}/ ]{2,29})").unwrap(),
    ];

    pub static ref DATE_OF_BIRTH_PATTERNS: Vec<Regex> = vec![
        labeled_date(r"date\s+of\s+birth|data\s+urodzenia|date\s+de\s+naissance"),
        labeled_date(r"birth\s+date|born(?:\s+on)?"),
    ];

    pub static ref DATE_OF_ISSUE_PATTERNS: Vec<Regex> = vec![
        labeled_date(r"date\s+of\s+issue|data\s+wydania|date\s+de\s+d[ée]livrance"),
        labeled_date(r"issued?\s+on|issue\s+date"),
    ];

    pub static ref DATE_OF_EXPIRY_PATTERNS: Vec<Regex> = vec![
        labeled_date(r"date\s+of\s+expiry|data\s+wa[żz]no[śs]ci|date\s+d['’]?expiration"),
        labeled_date(r"expiry\s+date|expires?(?:\s+on)?|valid\s+until"),
    ];

    // Anchored shapes used by date normalization.
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\- ](\d{1,2})[./\- ](\d{4}|\d{2})$"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[./\-](\d{1,2})[./\-](\d{1,2})$"
    ).unwrap();

    pub static ref DATE_MONTH_NAME: Regex = Regex::new(
        r"^(\d{1,2})\s+(\p{L}{3,12})\.?\s+(\d{4})$"
    ).unwrap();
}
