//! Integration tests for the ccscan CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const BREACH_EXPLICIT: &str =
    "We notify the supervisory authority within seventy-two hours of a personal data breach.";
const BREACH_IMPLIED: &str = "We will promptly inform regulators as appropriate.";

#[allow(deprecated)]
fn get_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ccscan").unwrap();
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("CCSCAN_CONFIG")
        .env_remove("RUST_LOG")
        .env("GITHUB_ACTIONS", "true");
    cmd
}

/// Temp workspace with `.ccscan.toml` and the bundled rules
fn initialized_workspace() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    get_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .success();
    temp_dir
}

fn write_doc(root: &Path, name: &str, content: &str) {
    let path = root.join("data/docs").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn output_files(root: &Path, extension: &str) -> Vec<std::path::PathBuf> {
    let dir = root.join("data/outputs");
    if !dir.exists() {
        return Vec::new();
    }
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect()
}

#[test]
fn test_init_creates_config_and_rules() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();

    assert!(root.join(".ccscan.toml").exists());
    assert!(root.join("rules/gdpr_critical.yml").exists());
    assert!(root.join("rules/soc2_critical.yml").exists());

    let content = fs::read_to_string(root.join(".ccscan.toml")).unwrap();
    assert!(content.contains("[paths]"));
    assert!(content.contains("[augment]"));
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    let temp_dir = initialized_workspace();

    get_cmd()
        .current_dir(temp_dir.path())
        .arg("init")
        .assert()
        .code(4)
        .stderr(predicate::str::contains("already exists"));

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_scan_finds_explicit_breach_timing() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "policy.txt", BREACH_EXPLICIT);

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GDPR-BREACH-72H"))
        .stdout(predicate::str::contains("Total findings: 1"))
        .stdout(predicate::str::contains("wrote 1 events"));

    let csvs = output_files(root, "csv");
    assert_eq!(csvs.len(), 1);
    let name = csvs[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("findings_gdpr_"), "unexpected name {name}");

    let csv = fs::read_to_string(&csvs[0]).unwrap();
    assert!(csv.starts_with("doc,rule_id,label,severity,start,end,snippet"));
    assert!(csv.contains("policy.txt,GDPR-BREACH-72H"));

    assert_eq!(output_files(root, "json").len(), 1);
    assert!(root.join("data/cc_audit.sqlite").exists());
}

#[test]
fn test_scan_implied_timing_is_missed_without_ai() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "memo.txt", BREACH_IMPLIED);

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total findings: 0"))
        .stdout(predicate::str::contains("No outputs written (no findings)."));

    assert!(output_files(root, "csv").is_empty());
}

#[test]
fn test_scan_with_ai_adds_heuristic_finding() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "memo.txt", BREACH_IMPLIED);

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "gdpr", "--ai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GDPR-BREACH-72H-IMPLICIT"))
        .stdout(predicate::str::contains("(AI adds: 1)"));

    let json_path = &output_files(root, "json")[0];
    let findings: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    let first = &findings[0];
    assert_eq!(first["source"], "llm");
    assert_eq!(first["start"], serde_json::Value::Null);
    assert!(first["confidence"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_scan_without_documents_succeeds() {
    let temp_dir = initialized_workspace();

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["scan", "--regime", "SOC2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed docs: 0"));
}

#[test]
fn test_scan_missing_rules_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    write_doc(temp_dir.path(), "policy.txt", BREACH_EXPLICIT);

    get_cmd()
        .current_dir(temp_dir.path())
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Missing rules file"));

    assert!(!temp_dir.path().join("data/cc_audit.sqlite").exists());
}

#[test]
fn test_scan_invalid_pattern_is_an_error() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    fs::write(
        root.join("rules/soc2_critical.yml"),
        "rules:\n  - id: BROKEN\n    label: Broken\n    value: '(unclosed'\n",
    )
    .unwrap();
    write_doc(root, "policy.txt", "MFA everywhere");

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "SOC2"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("BROKEN"));
}

#[test]
fn test_scan_unknown_regime_is_invalid_args() {
    get_cmd()
        .args(["scan", "--regime", "HIPAA"])
        .assert()
        .code(4);
}

#[test]
fn test_scan_skips_unreadable_document() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "a.txt", BREACH_EXPLICIT);
    write_doc(root, "b.pdf", "this is not a pdf");
    write_doc(root, "c.txt", BREACH_EXPLICIT);

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped docs: 1"))
        .stdout(predicate::str::contains("Total findings: 2"));

    let csv = fs::read_to_string(&output_files(root, "csv")[0]).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("b.pdf"));
}

#[test]
fn test_audit_failure_still_writes_exports() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "policy.txt", BREACH_EXPLICIT);
    // a directory where the database file should be
    fs::create_dir_all(root.join("data/cc_audit.sqlite")).unwrap();

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .code(5);

    assert_eq!(output_files(root, "csv").len(), 1);
    assert_eq!(output_files(root, "json").len(), 1);
}

#[test]
fn test_history_reports_recorded_runs() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    write_doc(root, "policy.txt", BREACH_EXPLICIT);

    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success();
    get_cmd()
        .current_dir(root)
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success();

    let output = get_cmd()
        .current_dir(root)
        .args(["history", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let history: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(history["summary"]["total"], 2);
    assert_eq!(history["summary"]["unique_docs"], 1);
    assert_eq!(history["events"].as_array().unwrap().len(), 2);

    let latest_run = history["summary"]["latest_run"]["run_id"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(history["events"][0]["run_id"], latest_run.as_str());

    let by_run = get_cmd()
        .current_dir(root)
        .args(["history", "--format", "json", "--run", &latest_run])
        .output()
        .unwrap();
    let by_run: serde_json::Value = serde_json::from_slice(&by_run.stdout).unwrap();
    assert_eq!(by_run["summary"]["total"], 1);

    get_cmd()
        .current_dir(root)
        .args(["history", "--regime", "SOC2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No audit events recorded."));
}

#[test]
fn test_directory_flag_changes_working_directory() {
    let temp_dir = initialized_workspace();
    write_doc(temp_dir.path(), "policy.txt", BREACH_EXPLICIT);

    get_cmd()
        .arg("-C")
        .arg(temp_dir.path())
        .args(["scan", "--regime", "GDPR"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GDPR-BREACH-72H"));
}

#[test]
fn test_config_flag_overrides_paths() {
    let temp_dir = initialized_workspace();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("policies")).unwrap();
    fs::write(root.join("policies/access.txt"), "All admins must use MFA.").unwrap();
    fs::write(
        root.join("custom.toml"),
        "[paths]\ndocs = \"policies\"\noutputs = \"exports\"\n",
    )
    .unwrap();

    get_cmd()
        .current_dir(root)
        .args(["--config", "custom.toml", "scan", "--regime", "SOC2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SOC2-ACCESS-CONTROL"));

    assert!(root.join("exports").is_dir());
}

#[test]
fn test_version_flag() {
    get_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
