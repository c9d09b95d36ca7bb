use serial_test::serial;
use tempfile::tempdir;

mod test_helpers;
use test_helpers::base_daybook_command;

#[test]
#[serial]
fn test_json_logs_on_stderr() {
    let dir = tempdir().unwrap();
    let output = base_daybook_command(dir.path())
        .args(["--log-format", "json", "threshold", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let lines: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).expect("log line should be JSON"))
        .collect();

    assert!(!lines.is_empty());
    let opened = lines
        .iter()
        .find(|line| {
            line["fields"]["message"]
                .as_str()
                .map_or(false, |m| m.starts_with("Opened journal"))
        })
        .expect("journal open should be logged");
    assert_eq!(opened["level"], "INFO");
    assert_eq!(opened["span"]["name"], "app_invocation");

    // stdout carries only the command's own output
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "time marker after 4 minutes idle\n");
}

#[test]
#[serial]
fn test_log_format_from_environment() {
    let dir = tempdir().unwrap();
    let output = base_daybook_command(dir.path())
        .env("DAYBOOK_LOG_FORMAT", "json")
        .args(["threshold", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let first = stderr.lines().next().expect("something should be logged");
    assert!(serde_json::from_str::<serde_json::Value>(first).is_ok());
}

#[test]
#[serial]
fn test_log_format_flag_wins_over_bad_environment() {
    let dir = tempdir().unwrap();
    let output = base_daybook_command(dir.path())
        .env("DAYBOOK_LOG_FORMAT", "xml")
        .args(["--log-format", "json", "threshold", "4"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    let first = stderr.lines().next().expect("something should be logged");
    assert!(serde_json::from_str::<serde_json::Value>(first).is_ok());
}

#[test]
#[serial]
fn test_verbose_enables_debug() {
    let dir = tempdir().unwrap();
    let output = base_daybook_command(dir.path())
        .args(["--verbose", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("DEBUG"));
    assert!(stderr.contains("[REDACTED_PATH]"));
}
