use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn judgement(outcome: &str) -> String {
    format!(
        r#"<document>
  <preliminaries>
    <req ID="R1">Il contribuente chiede l'annullamento</req>
    <arg ID="A1" SUP="R1">Difetto di motivazione</arg>
    <claim ID="C1" ATT="A1">L'Ufficio resiste</claim>
  </preliminaries>
  <decisions>
    <mot ID="M1">La motivazione è adeguata</mot>
    <dec ID="D1" esito="{outcome}">Rigetta l'appello</dec>
  </decisions>
</document>"#
    )
}

fn corpus(dir: &Path) {
    fs::write(dir.join("a.xml"), judgement("rigetto")).unwrap();
    fs::write(dir.join("b.xml"), judgement("accolto")).unwrap();
    // Missing <dec>: skipped with a warning
    fs::write(
        dir.join("c.xml"),
        "<document><req>r</req><arg>a</arg><claim>c</claim><mot>m</mot></document>",
    )
    .unwrap();
}

fn preprocess() -> Command {
    Command::cargo_bin("preprocess").unwrap()
}

#[test]
fn help_exits_successfully() {
    preprocess()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--level"))
        .stdout(predicate::str::contains("--cc-tag"));
}

#[test]
fn connected_components_without_tags_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.parquet");

    preprocess()
        .arg(&output)
        .args(["--level", "CONNECTED_COMPONENTS", "-e", "next"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("connected-component tag"));

    assert!(!output.exists());
}

#[test]
fn invalid_level_fails() {
    preprocess()
        .args(["out.parquet", "--level", "paragraph"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown level"));
}

#[test]
fn writes_dataset_and_skips_bad_documents() {
    let input = tempfile::tempdir().unwrap();
    corpus(input.path());
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("segments.parquet");

    preprocess()
        .arg(&output)
        .args(["--level", "segment", "--stats", "-i"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rows\": 10"))
        .stdout(predicate::str::contains("\"skipped\": 1"))
        .stderr(predicate::str::contains("Skipping malformed document"));

    assert!(output.exists());
    assert!(!out.path().join("segments.parquet.tmp").exists());
}

#[test]
fn connected_components_run() {
    let input = tempfile::tempdir().unwrap();
    corpus(input.path());
    let out = tempfile::tempdir().unwrap();
    let output = out.path().join("cc.parquet");

    preprocess()
        .arg(&output)
        .args(["-l", "connected_components", "-t", "req", "arg", "claim"])
        .args(["-e", "support", "attack", "--stats", "-i"])
        .arg(input.path())
        .assert()
        .success()
        // one {req, arg, claim} component per valid document
        .stdout(predicate::str::contains("\"rows\": 2"));
}

#[test]
fn identical_runs_produce_identical_files() {
    let input = tempfile::tempdir().unwrap();
    corpus(input.path());
    let out = tempfile::tempdir().unwrap();
    let first = out.path().join("first.parquet");
    let second = out.path().join("second.parquet");

    for output in [&first, &second] {
        preprocess()
            .arg(output)
            .args(["-l", "document", "-i"])
            .arg(input.path())
            .assert()
            .success();
    }

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn config_file_is_applied() {
    let input = tempfile::tempdir().unwrap();
    corpus(input.path());
    let out = tempfile::tempdir().unwrap();
    let config = out.path().join("config.json");
    fs::write(
        &config,
        format!(
            r#"{{ "input_folders": [{:?}], "level": "segment", "keep_other_outcomes": true }}"#,
            input.path()
        ),
    )
    .unwrap();

    preprocess()
        .arg(out.path().join("out.parquet"))
        .args(["--stats", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"rows\": 10"));
}

#[test]
fn bundled_dataset_is_the_default() {
    let out = tempfile::tempdir().unwrap();

    preprocess()
        .arg(out.path().join("default.parquet"))
        .arg("--stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"skipped\": 0"))
        .stdout(predicate::str::contains("\"rows\": 4"));
}

#[test]
fn relocated_binary_keeps_bundled_dataset() {
    let install = tempfile::tempdir().unwrap();
    let binary = install.path().join("preprocess");
    fs::copy(assert_cmd::cargo::cargo_bin("preprocess"), &binary).unwrap();
    let out = tempfile::tempdir().unwrap();

    Command::new(&binary)
        .current_dir(out.path())
        .args(["default.parquet", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"discovered\": 4"))
        .stdout(predicate::str::contains("\"skipped\": 0"));

    assert!(out.path().join("default.parquet").exists());
}

#[test]
fn missing_input_folder_fails() {
    let out = tempfile::tempdir().unwrap();

    preprocess()
        .arg(out.path().join("out.parquet"))
        .args(["-i", "/definitely/not/here"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read input folder"));
}
