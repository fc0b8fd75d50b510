// Integration tests for `holdings run`, `holdings validate` and `holdings ranges`.
// Run with: cargo test -p holdings-cli --test run_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn holdings() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_holdings"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

const MASTER: &str = "\
Status,Title,Acronymn,Platform ISSN,Subject Collection,\"Online date, start\",\"Online date, End\",Premier,Engineering Backfiles
Active,Management Decision,MD,0025-1747,Business,1963,2024,*,
Active,Kybernetes,K,0368-492X,Engineering,2000,2013,,*
Active,Library Hi Tech,LHT,0737-8831,Library Studies,2004,2008,,
";

const CLIENT: &str = "\
Product Name,Sub Year
Library Hi Tech,2005
Library Hi Tech,2006
Library Hi Tech,2010
Premier,2005
Engineering Backfiles,2019
";

fn config(extra: &str) -> String {
    format!(
        "name = \"Library\"\n{extra}\n\n[client]\nfile = \"client.csv\"\n\n[catalog]\nfile = \"master.csv\"\n\n\
         [output]\nannotated = \"out/annotated.csv\"\nmerged = \"out/merged.csv\"\n"
    )
}

fn fixture(dir: &Path, client: &str, config_text: &str) -> std::path::PathBuf {
    fs::create_dir_all(dir.join("out")).unwrap();
    fs::write(dir.join("master.csv"), MASTER).unwrap();
    fs::write(dir.join("client.csv"), client).unwrap();
    let path = dir.join("library.holdings.toml");
    fs::write(&path, config_text).unwrap();
    path
}

#[test]
fn run_writes_outputs_and_summary() {
    let dir = tempdir().unwrap();
    let config = fixture(dir.path(), CLIENT, &config(""));

    let output = holdings().arg("run").arg(&config).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let err = stderr(&output);
    assert!(err.contains("3 of 3 catalog rows covered"), "stderr: {err}");

    let merged = fs::read_to_string(dir.path().join("out/merged.csv")).unwrap();
    let mut lines = merged.lines();
    assert_eq!(
        lines.next(),
        Some("Status,Title,Acronymn,Platform ISSN,During,Product Names")
    );
    assert!(merged.contains("Active,Kybernetes,K,0368-492X,[2000~2006],Engineering Backfiles"));
    assert!(merged.contains("Active,Library Hi Tech,LHT,0737-8831,[2005~2006],Library Hi Tech"));

    let annotated = fs::read_to_string(dir.path().join("out/annotated.csv")).unwrap();
    assert!(annotated.lines().next().unwrap().ends_with("Subscribe Period,Products"));
}

#[test]
fn run_json_to_stdout_and_file() {
    let dir = tempdir().unwrap();
    let config = fixture(dir.path(), CLIENT, &config(""));
    let out = dir.path().join("result.json");

    let output = holdings()
        .arg("run")
        .arg(&config)
        .arg("--json")
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stdout: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is a single JSON value");
    assert_eq!(stdout["meta"]["config_name"], "Library");
    assert_eq!(stdout["summary"]["covered_rows"], 3);

    let file: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(file["summary"], stdout["summary"]);
}

#[test]
fn invalid_product_reported_not_fatal() {
    let dir = tempdir().unwrap();
    let client = format!("{CLIENT}Mystery Journal,2005\n");
    let config = fixture(dir.path(), &client, &config(""));

    let output = holdings().arg("run").arg(&config).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("invalid products: 1"));
}

#[test]
fn strict_run_exits_62() {
    let dir = tempdir().unwrap();
    let client = format!("{CLIENT}Mystery Journal,2005\n");
    let config = fixture(dir.path(), &client, &config("strict = true"));

    let output = holdings().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(62));
    let err = stderr(&output);
    assert!(err.contains("error: cannot classify product 'Mystery Journal'"), "stderr: {err}");
    assert!(err.contains("hint:"));
}

#[test]
fn deny_warnings_exits_63() {
    let dir = tempdir().unwrap();
    let client = format!("{CLIENT}Premier,someday\n");
    let config = fixture(dir.path(), &client, &config(""));

    let ok = holdings().arg("run").arg(&config).output().unwrap();
    assert!(ok.status.success());

    let denied = holdings()
        .arg("run")
        .arg(&config)
        .arg("--deny-warnings")
        .output()
        .unwrap();
    assert_eq!(denied.status.code(), Some(63));
}

#[test]
fn missing_input_exits_61() {
    let dir = tempdir().unwrap();
    let config = fixture(dir.path(), CLIENT, &config(""));
    fs::remove_file(dir.path().join("master.csv")).unwrap();

    let output = holdings().arg("run").arg(&config).output().unwrap();
    assert_eq!(output.status.code(), Some(61));
    assert!(stderr(&output).contains("master.csv"));
}

#[test]
fn validate_accepts_and_rejects() {
    let dir = tempdir().unwrap();
    let good = fixture(dir.path(), CLIENT, &config(""));
    let output = holdings().arg("validate").arg(&good).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("Library: ok"));

    let bad = dir.path().join("bad.holdings.toml");
    fs::write(
        &bad,
        "name = \"x\"\n[client]\nfile = \"c.csv\"\n[catalog]\nfile = \"m.csv\"\n\
         [products.backfile]\nstandard = [2010, 2000]\n",
    )
    .unwrap();
    let output = holdings().arg("validate").arg(&bad).output().unwrap();
    assert_eq!(output.status.code(), Some(60));

    let missing = holdings()
        .arg("validate")
        .arg(dir.path().join("nope.toml"))
        .output()
        .unwrap();
    assert_eq!(missing.status.code(), Some(60));
}

#[test]
fn ranges_prints_compressed_years() {
    let output = holdings().args(["ranges", "2008", "2005", "2006", "2006"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "2005~2006, 2008");

    let output = holdings().args(["ranges", "2010,2008,2009", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json, vec!["2008~2010"]);
}

#[test]
fn ranges_rejects_bad_input() {
    let output = holdings().args(["ranges", "abc"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));

    let output = holdings().args(["ranges", "20050"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}
