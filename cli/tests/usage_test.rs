//! CLI behaviour that needs no external tools.

use std::process::Command;

fn pdf2image() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pdf2image"));
    // Point the tools somewhere that cannot run, so any invocation would fail loudly.
    cmd.env("PDF2IMAGE_PDFIMAGES", "/nonexistent/pdfimages")
        .env("PDF2IMAGE_CONVERT", "/nonexistent/convert");
    cmd
}

#[test]
fn test_missing_argument_prints_usage() {
    let output = pdf2image().output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("An input PDF file is required"));
    assert!(stdout.contains("Usage: pdf2image"));
    assert!(!stdout.contains("An error occurred while running"));
}

#[test]
fn test_missing_tool_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("doc.pdf");
    std::fs::write(&pdf, b"%PDF-1.7\n").unwrap();

    let output = pdf2image().arg("--quiet").arg(&pdf).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/pdfimages"));
}

#[test]
fn test_help_lists_options() {
    let output = pdf2image().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--pdfimages"));
    assert!(stdout.contains("--convert"));
    assert!(stdout.contains("--order"));
}
