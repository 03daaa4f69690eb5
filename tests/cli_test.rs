//! End-to-end tests for the `rst2db` and `rst2md` binaries.

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> String {
    format!("{FIXTURES_DIR}/{name}")
}

fn rst2db() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rst2db"))
}

fn rst2md() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rst2md"))
}

#[test]
fn test_document_id_defaults_to_output_stem() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("setup-guide.xml");

    let status = rst2db()
        .arg(fixture_path("guide.xml"))
        .arg("-o")
        .arg(&output)
        .arg("-e")
        .arg("chapter")
        .status()
        .unwrap();
    assert!(status.success());

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"yes\"?>\n<chapter"));
    assert!(xml.contains("xml:id=\"setup-guide\""));
    assert!(xml.contains("<title xml:id=\"setup-guide.title\">Installation</title>"));
}

#[test]
fn test_explicit_id_and_stdout() {
    let output = rst2db()
        .arg(fixture_path("guide.xml"))
        .arg("--id")
        .arg("custom")
        .output()
        .unwrap();
    assert!(output.status.success());

    let xml = String::from_utf8(output.stdout).unwrap();
    assert!(xml.contains("xml:id=\"custom\""));
    assert!(xml.trim_end().ends_with("</section>"));
}

#[test]
fn test_template_wraps_output_without_declaration() {
    let dir = TempDir::new().unwrap();
    let template = dir.path().join("book.j2");
    fs::write(
        &template,
        "<book>\n<!-- {{ data.author }} / {{ data.root_element }} -->\n{{ data.contents }}</book>\n",
    )
    .unwrap();
    let output = dir.path().join("out.xml");

    let status = rst2db()
        .arg(fixture_path("guide.xml"))
        .arg("-o")
        .arg(&output)
        .arg("-t")
        .arg(&template)
        .status()
        .unwrap();
    assert!(status.success());

    let xml = fs::read_to_string(&output).unwrap();
    assert!(xml.starts_with("<book>\n<!-- Jane Doe / section -->\n<section"));
    assert!(!xml.contains("<?xml"));
}

#[test]
fn test_missing_template_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.xml");
    let metadata = dir.path().join("meta.json");

    let result = rst2db()
        .arg(fixture_path("guide.xml"))
        .arg("-o")
        .arg(&output)
        .arg("-t")
        .arg(dir.path().join("missing.j2"))
        .arg("--metadata")
        .arg(&metadata)
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("error: Template file doesn't exist"), "{stderr}");
    assert!(!Path::new(&output).exists());
    assert!(!Path::new(&metadata).exists());
}

#[test]
fn test_failed_output_write_leaves_no_metadata() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("meta.json");

    for mut command in [rst2db(), rst2md()] {
        let result = command
            .arg(fixture_path("guide.xml"))
            .arg("-o")
            .arg(dir.path())
            .arg("--metadata")
            .arg(&metadata)
            .output()
            .unwrap();
        assert!(!result.status.success());
        assert!(String::from_utf8_lossy(&result.stderr).contains("error: cannot write"));
        assert!(!metadata.exists());
    }
}

#[test]
fn test_failed_metadata_write_removes_output() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("out.xml");

    let result = rst2db()
        .arg(fixture_path("guide.xml"))
        .arg("-o")
        .arg(&output)
        .arg("--metadata")
        .arg(dir.path().join("missing").join("meta.json"))
        .output()
        .unwrap();
    assert!(!result.status.success());
    assert!(!output.exists());
}

#[test]
fn test_invalid_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.xml");
    fs::write(&input, "<section><title>x</title></section>").unwrap();
    let output = dir.path().join("out.xml");

    let result = rst2db().arg(&input).arg("-o").arg(&output).output().unwrap();
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("error: Invalid document tree"));
    assert!(!output.exists());
}

#[test]
fn test_metadata_json() {
    let dir = TempDir::new().unwrap();
    let metadata = dir.path().join("meta.json");

    let status = rst2md()
        .arg(fixture_path("guide.xml"))
        .arg("-o")
        .arg(dir.path().join("guide.md"))
        .arg("--metadata")
        .arg(&metadata)
        .status()
        .unwrap();
    assert!(status.success());

    let json = fs::read_to_string(&metadata).unwrap();
    assert_eq!(
        json,
        "{\n  \"author\": \"Jane Doe\",\n  \"date\": \"2024-05-01\",\n  \"status\": \"draft\"\n}\n"
    );
}

#[test]
fn test_rst2md_output() {
    let output = rst2md().arg(fixture_path("guide.xml")).output().unwrap();
    assert!(output.status.success());
    let markdown = String::from_utf8(output.stdout).unwrap();
    assert!(markdown.starts_with("# Installation\n\n"));
    assert!(markdown.contains("```shell\ncargo build --release\n```\n"));
}
