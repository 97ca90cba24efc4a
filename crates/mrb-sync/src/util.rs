use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use std::process::Command;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn display_time(t: DateTime<Utc>) -> String {
    t.format(DISPLAY_FORMAT).to_string()
}

pub fn run_cmd(dir: &std::path::Path, program: &str, args: &[&str]) -> Result<String> {
    tracing::debug!(dir = %dir.display(), program, ?args, "exec");
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    let out = cmd.output().with_context(|| format!("run {} {:?}", program, args))?;
    if !out.status.success() {
        return Err(anyhow!(
            "command failed: {} {:?}\nstdout:{}\nstderr:{}",
            program,
            args,
            String::from_utf8_lossy(&out.stdout),
            String::from_utf8_lossy(&out.stderr)
        ));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}
