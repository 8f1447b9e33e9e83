//! End-to-end tests for the padex binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn padex() -> Command {
    Command::cargo_bin("padex").unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    padex()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("assess"))
        .stdout(predicate::str::contains("batch"));
}

#[test]
fn test_extract_text_only_recovers_labeled_fields() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scan.pdf");
    std::fs::write(
        &input,
        "SURNAME: KOWALSKA\nGIVEN NAMES: ANNA\nPassport No. EH1234567\n",
    )
    .unwrap();

    padex()
        .arg("extract")
        .arg(&input)
        .arg("--text-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("KOWALSKA"))
        .stdout(predicate::str::contains("EH1234567"));
}

#[test]
fn test_extract_rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.docx");
    std::fs::write(&input, "irrelevant").unwrap();

    padex()
        .arg("extract")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn test_assess_empty_manifest_is_red() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("case.json");
    std::fs::write(&manifest, "[]").unwrap();

    padex()
        .arg("assess")
        .arg(&manifest)
        .assert()
        .success()
        .stdout(predicate::str::contains("RED"))
        .stdout(predicate::str::contains("Required document missing: Passport"));
}

#[test]
fn test_assess_override_appends_audit_line() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("case.json");
    std::fs::write(&manifest, "[]").unwrap();

    padex()
        .arg("assess")
        .arg(&manifest)
        .arg("--override-reason")
        .arg("archival copy accepted")
        .arg("--override-actor")
        .arg("m.wisniewska")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "OVERRIDE APPLIED: archival copy accepted (by m.wisniewska)",
        ))
        .stdout(predicate::str::contains("yes"));
}

#[test]
fn test_assess_complete_manifest_is_green() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("case.json");
    std::fs::write(
        &manifest,
        r#"["passport", "birth_certificate", "ancestor_document",
            "marriage_certificate", "name_change_decree", "archival_record"]"#,
    )
    .unwrap();

    padex()
        .arg("assess")
        .arg(&manifest)
        .arg("--format")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"GREEN\""))
        .stdout(predicate::str::contains("\"canProceed\": true"));
}
