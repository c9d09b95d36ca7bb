#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

pub const DEFAULT_PASSWORD: &str = "daybook";

/// Creates a `Command` for the `daybook` binary with a clean environment and
/// its data directory set to `data_dir`.
pub fn base_daybook_command(data_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("daybook").expect("daybook binary not built");
    configure_daybook_command(&mut cmd, data_dir);
    cmd
}

/// Applies the standard non-interactive environment to an existing `Command`.
pub fn configure_daybook_command(cmd: &mut Command, data_dir: &Path) {
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
        cmd.env("PATH", path);
    }
    if let Ok(tmpdir) = std::env::var("TMPDIR") {
        cmd.env("TMPDIR", tmpdir);
    }
    cmd.env("HOME", "/tmp");
    cmd.env("DAYBOOK_DIR", data_dir);
}

/// Today's entry key, as the binary computes it.
pub fn today_key() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
