use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn workspace_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).expect("write input");
    }
    dir
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {}", path.display(), e))
}

#[test]
fn convert_writes_next_to_input() {
    let dir = workspace_with(&[]);
    let input = dir.path().join("basic.mfm");
    fs::copy(fixture_path("basic.mfm"), &input).unwrap();

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).arg(&input);
    cmd.assert().success().stderr(predicate::str::is_empty());

    let output = read(&dir.path().join("basic.yaml"));
    assert!(output.starts_with("Color:\n  0: White\n"));
    assert!(output.contains("\n---\n"));
    assert!(output.contains("'[0, 2]': !Size\n- !FontSize Size\n"));
}

#[test]
fn explicit_output_applies_to_preceding_input() {
    let dir = workspace_with(&[
        ("a.mfm", "map kind int\n0 foo\n"),
        ("b.mfm", "[1, 2] doThing int n\n"),
    ]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path())
        .arg("a.mfm")
        .arg("-o")
        .arg("renamed.yml")
        .arg("b.mfm");
    cmd.assert().success();

    assert_eq!(read(&dir.path().join("renamed.yml")), "Kind:\n  0: Foo\n---\n{}\n");
    assert!(!dir.path().join("a.yaml").exists());
    assert_eq!(
        read(&dir.path().join("b.yaml")),
        "{}\n---\n'[1, 2]': !DoThing\n- !int N\n"
    );
}

#[test]
fn output_before_input_is_a_usage_error() {
    let dir = workspace_with(&[("a.mfm", "")]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).args(["-o", "x.yaml", "a.mfm"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not preceded by an input"));
}

#[test]
fn failing_input_is_reported_and_others_continue() {
    let dir = workspace_with(&[
        ("bad.mfm", "map Kind int\n0 Foo\n@oops\n"),
        ("good.mfm", "map Kind int\n0 Foo\n"),
    ]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).arg("bad.mfm").arg("good.mfm");
    cmd.assert().failure().code(1).stderr(
        predicate::str::contains("bad.mfm: Error at 3:1: Invalid integer '@oops'")
            .and(predicate::str::contains(">>   3 | @oops")),
    );

    assert!(!dir.path().join("bad.yaml").exists());
    assert!(dir.path().join("good.yaml").exists());
}

#[test]
fn config_can_stop_at_first_failure() {
    let dir = workspace_with(&[
        ("bad.mfm", "[1, 2] a\n[1, 2] b\n"),
        ("good.mfm", "map Kind int\n"),
        ("strict.toml", "[convert]\ncontinue_on_error = false\n"),
    ]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path())
        .args(["--config", "strict.toml", "bad.mfm", "good.mfm"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate function '[1, 2]'"));

    assert!(!dir.path().join("good.yaml").exists());
}

#[test]
fn local_config_sets_output_extension() {
    let dir = workspace_with(&[
        ("a.mfm", "map Kind int\n"),
        ("mfm.toml", "[convert]\noutput_extension = \"yml\"\n"),
    ]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).arg("a.mfm");
    cmd.assert().success();

    assert!(dir.path().join("a.yml").exists());
}

#[test]
fn json_format_flag() {
    let dir = workspace_with(&[("a.mfm", "map kind int\n0 foo\n")]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path())
        .args(["a.mfm", "-o", "a.json", "--format", "json"]);
    cmd.assert().success();

    let output = read(&dir.path().join("a.json"));
    assert!(output.contains("\"Kind\""));
    assert!(output.contains("\"Foo\""));
}

#[test]
fn unknown_format_lists_alternatives() {
    let dir = workspace_with(&[("a.mfm", "")]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).args(["a.mfm", "-f", "toml"]);
    cmd.assert().failure().stderr(
        predicate::str::contains("Format 'toml' not found")
            .and(predicate::str::contains("json, yaml")),
    );
}

#[test]
fn missing_input_file() {
    let dir = workspace_with(&[]);

    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.current_dir(dir.path()).arg("absent.mfm");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("absent.mfm: Error reading file"));
}

#[test]
fn list_formats() {
    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.arg("--list-formats");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("yaml").and(predicate::str::contains("json")));
}

#[test]
fn version_flag() {
    let mut cmd = cargo_bin_cmd!("mfm");
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
