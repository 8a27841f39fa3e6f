//! Runs the compiled binary against documents written to a temp dir.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;
use typed_fetch_generator::{generate, Error, OpenApi};

const PING_JSON: &str = r#"{
    "openapi": "3.1.0",
    "paths": { "/ping": { "get": { "responses": { "200": { "description": "pong" } } } } }
}"#;

const PING_YAML: &str = r#"
openapi: 3.1.0
paths:
  /ping:
    get:
      responses:
        "200":
          description: pong
"#;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/petstore.yaml")
}

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_typed_fetch_generator"))
}

#[test]
fn json_yaml_and_yml_load_to_the_same_output() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("ping.json");
    let yaml = dir.path().join("ping.yaml");
    let yml = dir.path().join("ping.yml");
    fs::write(&json, PING_JSON).unwrap();
    fs::write(&yaml, PING_YAML).unwrap();
    fs::write(&yml, PING_YAML).unwrap();

    let expected = generate(&OpenApi::from_path(&json).unwrap()).unwrap();
    assert_eq!(generate(&OpenApi::from_path(&yaml).unwrap()).unwrap(), expected);
    assert_eq!(generate(&OpenApi::from_path(&yml).unwrap()).unwrap(), expected);
}

#[test]
fn loader_reports_missing_and_malformed_files() {
    let dir = TempDir::new().unwrap();

    let missing = OpenApi::from_path(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(missing, Error::Io { .. }));

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{ not json").unwrap();
    assert!(matches!(OpenApi::from_path(&broken).unwrap_err(), Error::Json(_)));
}

#[test]
fn writes_to_stdout_without_output_flag() {
    let output = binary().arg("--openapi").arg(fixture()).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let expected = generate(&OpenApi::from_path(fixture()).unwrap()).unwrap();
    assert_eq!(stdout, format!("{expected}\n"));
}

#[test]
fn writes_to_output_file() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("client.ts");

    let status = binary()
        .arg("--openapi")
        .arg(fixture())
        .arg("--output")
        .arg(&target)
        .arg("--runtime")
        .status()
        .unwrap();

    assert!(status.success());
    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("export interface Client {"));
    assert!(written.contains("class ClientImpl"));
    assert!(!written.ends_with('\n'));
}

#[test]
fn fails_on_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.txt");
    fs::write(&input, PING_JSON).unwrap();

    let output = binary().arg("--openapi").arg(&input).output().unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported file format"));
}

#[test]
fn fails_on_generation_errors() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("api.json");
    fs::write(
        &input,
        r#"{ "paths": { "/x": { "get": { "responses": {
            "200": { "content": { "application/json": { "schema": { "type": "array" } } } }
        } } } } }"#,
    )
    .unwrap();

    let output = binary().arg("--openapi").arg(&input).output().unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr)
        .contains("GET /x, ResponseDataGetX (application/json): invalid schema"));
}

#[test]
fn requires_the_openapi_flag() {
    let output = binary().output().unwrap();
    assert!(!output.status.success());
}
