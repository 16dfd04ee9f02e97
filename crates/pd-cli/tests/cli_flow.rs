//! End-to-end tests for the `payday` binary.
//!
//! Each test runs the binary in a fresh temp directory with an isolated HOME
//! so no user config or environment leaks in.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use insta::assert_snapshot;
use tempfile::TempDir;

const WEEK: &str = "\
Monday 9-12 at Warehouse A for Acme, loading | 12-17 at Warehouse A for Acme, unloading
Tue 0900-1700 = at Client Site for BigCo, site survey | lunch: no
just some notes
Fri 8am-4pm with Jane Doe, consulting | break
";

fn payday(temp: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_payday"));
    cmd.current_dir(temp)
        .env("HOME", temp)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("PAYDAY_LOG")
        .env_remove("PAYDAY_LOG_FILE")
        .env_remove("PAYDAY_OUTPUT_PATH")
        .arg("--today")
        .arg("2025-03-10");
    cmd
}

fn write_input(temp: &Path, text: &str) -> std::path::PathBuf {
    let path = temp.join("week.txt");
    std::fs::write(&path, text).unwrap();
    path
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_file_input_writes_default_csv() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), WEEK);

    let output = payday(temp.path()).arg(&input).output().unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let csv = std::fs::read_to_string(temp.path().join("cpd.csv")).unwrap();
    let (body, watermark) = csv.trim_end().rsplit_once('\n').unwrap();
    assert!(watermark.starts_with("# Compiled with PayDay"));
    assert_snapshot!(body, @r#"
    Day,TimeBlocks,Location,Tasks/Details,Client(s),Hours
    monday,"0900-1200, 1200-1700","Warehouse A, Warehouse A","Loading, Unloading","Acme, Acme",7.5
    tuesday,0900-1700,Client Site,Site Survey,Bigco,8.0
    friday,0800-1600,NaN,Consulting (Lunch),Jane Doe,7.5
    TOTAL,,,,,23.0
    "#);
    assert!(stderr(&output).contains("wrote 3 row(s)"));
}

#[test]
fn test_stdin_input_and_output_flag() {
    let temp = TempDir::new().unwrap();
    let mut child = payday(temp.path())
        .arg("-o")
        .arg("reports/week.csv")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Wed 10-14, 16-18\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let csv = std::fs::read_to_string(temp.path().join("reports/week.csv")).unwrap();
    assert!(csv.contains("wednesday,\"1000-1400, 1600-1800\",\"NaN, NaN\",\"NaN, NaN\",\"NaN, NaN\",5.5"));
    assert!(!temp.path().join("cpd.csv").exists());
}

#[test]
fn test_json_output_skips_csv() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "Fri 8am-4pm with Jane Doe, consulting | break\n");

    let output = payday(temp.path())
        .arg(&input)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\"Tasks/Details\": \"Consulting (Lunch)\""));
    assert!(stdout.contains("\"total_hours\": 7.5"));
    assert!(!temp.path().join("cpd.csv").exists());
}

#[test]
fn test_no_rows_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "nothing to see here\n\n");

    let output = payday(temp.path()).arg(&input).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!temp.path().join("cpd.csv").exists());
}

#[test]
fn test_empty_stdin_exits_with_one() {
    let temp = TempDir::new().unwrap();
    let output = payday(temp.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_missing_input_exits_with_two() {
    let temp = TempDir::new().unwrap();
    let output = payday(temp.path()).arg("absent.txt").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("input file not found"));
}

#[test]
fn test_missing_config_exits_with_two() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), WEEK);
    let output = payday(temp.path())
        .arg(&input)
        .arg("--config")
        .arg("absent.toml")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_user_config_and_env_override() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join(".config/payday");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        "output_path = \"from-config.csv\"\n\n[policy]\nlunch_deduction_hours = 1.0\n",
    )
    .unwrap();
    let input = write_input(temp.path(), "Mon 0900-1700 at HQ\n");

    let output = payday(temp.path())
        .arg(&input)
        .env("PAYDAY_POLICY__TASK_CASE", "sentence")
        .output()
        .unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let csv = std::fs::read_to_string(temp.path().join("from-config.csv")).unwrap();
    assert!(csv.contains("monday,0900-1700,HQ,NaN,NaN,7.0"), "{csv}");
}

#[test]
fn test_policy_flags() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "Mon 0900-1700 prep QA work\n");

    let output = payday(temp.path())
        .arg(&input)
        .arg("--no-default-lunch")
        .arg("--task-case")
        .arg("sentence")
        .output()
        .unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let csv = std::fs::read_to_string(temp.path().join("cpd.csv")).unwrap();
    assert!(csv.contains("monday,0900-1700,NaN,Prep QA work,NaN,8.0"), "{csv}");
}

#[test]
fn test_log_file_receives_output() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "Mon 0900-1700\n");
    let log = temp.path().join("payday.log");

    let output = payday(temp.path())
        .arg(&input)
        .env("PAYDAY_LOG_FILE", &log)
        .output()
        .unwrap();
    assert!(output.status.success(), "payday failed: {}", stderr(&output));

    let logged = std::fs::read_to_string(&log).unwrap();
    assert!(logged.contains("wrote 1 row(s)"), "{logged}");
}

#[test]
fn test_invalid_policy_exits_with_two() {
    let temp = TempDir::new().unwrap();
    let input = write_input(temp.path(), "Mon 0900-1700\n");
    let output = payday(temp.path())
        .arg(&input)
        .arg("--tolerance=-5")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("invalid policy configuration"));
}
