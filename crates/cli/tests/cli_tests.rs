// Integration tests for the `rowcheck` binary.
// Run with: cargo test -p rowcheck-cli --test cli_tests -- --nocapture

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

const SAMPLE: &str = "sales,email\n100,x@y.com\n-5,bad\nabc,a@b.co\n";

/// Command isolated from the user's settings and environment.
fn rowcheck(settings: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rowcheck"));
    cmd.env("ROWCHECK_CONFIG", settings)
        .env_remove("ROWCHECK_PREVIEW_ID")
        .env_remove("ROWCHECK_PREVIEW_SECRET_SHA256")
        .env_remove("ROWCHECK_LOG");
    cmd
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn settings(&self) -> PathBuf {
        self.dir.path().join("settings.json")
    }

    fn run(&self, args: &[&str]) -> Output {
        rowcheck(&self.settings()).args(args).output().expect("run rowcheck")
    }

    fn run_with_stdin(&self, args: &[&str], stdin: &str) -> Output {
        let mut child = rowcheck(&self.settings())
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("spawn rowcheck");
        child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
        child.wait_with_output().unwrap()
    }
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// validate
// ---------------------------------------------------------------------------

#[test]
fn validate_lists_rows_with_issues() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&["validate", data.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(60), "stderr: {}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "Row 2: Negative sales, Invalid email format\nRow 3: Invalid sales\n"
    );
}

#[test]
fn validate_clean_file_exits_zero() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", "sales,email\n1,a@b.com\n0,c@d.org\n");
    let out = fx.run(&["validate", data.to_str().unwrap()]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "All data passed validation.\n");
}

#[test]
fn validate_json_report() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let report_path = fx.dir.path().join("report.json");
    let out = fx.run(&[
        "validate",
        data.to_str().unwrap(),
        "--json",
        "--output",
        report_path.to_str().unwrap(),
    ]);

    assert_eq!(out.status.code(), Some(60));
    let json: serde_json::Value = serde_json::from_str(&stdout(&out)).expect("valid JSON");
    assert_eq!(json["summary"]["rows_checked"], 3);
    assert_eq!(json["summary"]["rows_with_issues"], 2);
    assert_eq!(json["summary"]["clean"], false);
    assert_eq!(json["log"][0], "Row 2: Negative sales, Invalid email format");

    let on_disk: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(on_disk["summary"], json["summary"]);
}

#[test]
fn validate_with_rules_file() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", "amount,contact\n-1,x@y.com\n2,nope\n");
    let rules = fx.file(
        "rules.toml",
        "[[rule]]\nkind = \"non_negative_number\"\nfield = \"amount\"\n\n\
         [[rule]]\nkind = \"email\"\nfield = \"contact\"\n",
    );
    let out = fx.run(&["validate", data.to_str().unwrap(), "--rules", rules.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(60));
    assert_eq!(stdout(&out), "Row 1: Negative amount\nRow 2: Invalid contact format\n");
}

#[test]
fn validate_rules_path_from_settings() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", "amount\n-1\n");
    let rules = fx.file("rules.toml", "[[rule]]\nkind = \"non_negative_number\"\nfield = \"amount\"\n");
    fs::write(
        fx.settings(),
        serde_json::json!({ "rules.path": rules }).to_string(),
    )
    .unwrap();

    let out = fx.run(&["validate", data.to_str().unwrap()]);
    assert_eq!(stdout(&out), "Row 1: Negative amount\n");
}

#[test]
fn validate_bad_rules_file_is_parse_error() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let rules = fx.file("rules.toml", "[[rule]]\nkind = \"telepathy\"\nfield = \"x\"\n");
    let out = fx.run(&["validate", data.to_str().unwrap(), "--rules", rules.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("error:"));
    assert!(stderr(&out).contains("hint:"));
}

#[test]
fn validate_missing_file_is_io_error() {
    let fx = Fixture::new();
    let missing = fx.dir.path().join("nope.csv");
    let out = fx.run(&["validate", missing.to_str().unwrap()]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn validate_semicolon_file_is_sniffed() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", "sales;email\n-1;a@b.com\n");
    let out = fx.run(&["validate", data.to_str().unwrap()]);
    assert_eq!(stdout(&out), "Row 1: Negative sales\n");
}

// ---------------------------------------------------------------------------
// fix
// ---------------------------------------------------------------------------

#[test]
fn fix_reports_update_and_fresh_log() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&[
        "fix",
        data.to_str().unwrap(),
        "--row",
        "2",
        "--set",
        "sales=5",
        "--set",
        "email=ok@fixed.com",
    ]);

    assert_eq!(out.status.code(), Some(60), "row 3 is still invalid");
    let text = stdout(&out);
    assert!(text.starts_with("Row 2 updated successfully.\n"));
    assert!(text.ends_with("Row 3: Invalid sales\n"));
    assert!(!text.contains("Row 2: "));
    // Nothing is written back
    assert_eq!(fs::read_to_string(&data).unwrap(), SAMPLE);
}

#[test]
fn fix_last_issue_exits_zero() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", "sales,email\n-1,a@b.com\n");
    let out = fx.run(&["fix", data.to_str().unwrap(), "--row", "1", "--set", "sales=1"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(stdout(&out).ends_with("All data passed validation.\n"));
}

#[test]
fn fix_out_of_range_row() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&["fix", data.to_str().unwrap(), "--row", "9", "--set", "sales=1"]);

    assert_eq!(out.status.code(), Some(61));
    assert!(stderr(&out).contains("row 9 does not exist"));
}

#[test]
fn fix_row_zero_is_usage_error() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&["fix", data.to_str().unwrap(), "--row", "0", "--set", "sales=1"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn fix_only_flagged_rejects_other_fields() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&[
        "fix",
        data.to_str().unwrap(),
        "--row",
        "3",
        "--set",
        "email=other@x.com",
        "--only-flagged",
    ]);

    assert_eq!(out.status.code(), Some(62));
    assert!(stderr(&out).contains("email"));
}

// ---------------------------------------------------------------------------
// preview / hash-secret
// ---------------------------------------------------------------------------

#[test]
fn preview_denied_without_configuration() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let out = fx.run(&["preview", data.to_str().unwrap(), "--id", "admin", "--secret", "1234"]);

    assert_eq!(out.status.code(), Some(70));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Access denied"));
}

#[test]
fn preview_with_configured_credentials() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);

    let hashed = fx.run_with_stdin(&["hash-secret"], "s3cret\n");
    assert!(hashed.status.success());
    let digest = stdout(&hashed).trim().to_string();
    assert_eq!(digest.len(), 64);

    fs::write(
        fx.settings(),
        serde_json::json!({
            "preview.identity": "admin",
            "preview.secretSha256": digest,
            "preview.rowLimit": 2,
        })
        .to_string(),
    )
    .unwrap();

    let out = fx.run_with_stdin(
        &["preview", data.to_str().unwrap(), "--id", "admin", "--secret-stdin"],
        "s3cret\n",
    );
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "sales\temail");
    assert_eq!(lines[1], "-".repeat(100));
    assert_eq!(&lines[2..], &["100\tx@y.com", "-5\tbad"]);

    let wrong = fx.run(&["preview", data.to_str().unwrap(), "--id", "admin", "--secret", "nope"]);
    assert_eq!(wrong.status.code(), Some(70));
}

#[test]
fn preview_rows_flag_overrides_limit() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let mut cmd = rowcheck(&fx.settings());
    cmd.env("ROWCHECK_PREVIEW_ID", "ops").env(
        "ROWCHECK_PREVIEW_SECRET_SHA256",
        // sha256("abc")
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    );
    let out = cmd
        .args(["preview", data.to_str().unwrap(), "--id", "ops", "--secret", "abc", "--rows", "1"])
        .output()
        .unwrap();

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).lines().count(), 3);
}

// ---------------------------------------------------------------------------
// shell
// ---------------------------------------------------------------------------

#[test]
fn shell_session_over_stdin() {
    let fx = Fixture::new();
    let data = fx.file("data.csv", SAMPLE);
    let script = "validate\nerrors\nfix 2 sales=5 email=ok@fixed.com\nfix 3 sales=7\nvalidate\nerrors\nquit\n";
    let out = fx.run_with_stdin(&["shell", data.to_str().unwrap()], script);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("Row 2: Negative sales, Invalid email format\nRow 3: Invalid sales\n"));
    assert!(text.contains("Row 2 updated successfully.\n"));
    assert!(text.contains("Row 3 updated successfully.\n"));
    assert!(text.contains("All data passed validation.\n"));
    assert!(text.ends_with("No errors found. Run validation first.\n"));
}

#[test]
fn shell_without_file_reports_no_data() {
    let fx = Fixture::new();
    let out = fx.run_with_stdin(&["shell"], "validate\n");
    assert!(out.status.success());
    assert_eq!(stdout(&out), "No data loaded.\n");
}
