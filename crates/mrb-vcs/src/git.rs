use std::path::Path;
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

pub type RevId = String;

/// Date format git's own parser accepts without reinterpreting the timezone.
pub fn git_datetime(t: DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S +0000").to_string()
}

/// Git backend. Every call runs `git` scoped to an explicit metadata
/// directory via `current_dir`; the process working directory is never
/// touched, so a failing call cannot leave later ones running against the
/// wrong project.
pub struct GitBackend;

impl GitBackend {
    fn run(dir: &Path, args: &[&str]) -> Result<String> {
        tracing::debug!(dir = %dir.display(), ?args, "git");
        let out = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .with_context(|| format!("run git {:?} in {}", args, dir.display()))?;
        if !out.status.success() {
            return Err(anyhow!(
                "git {:?} failed in {}\nstdout:{}\nstderr:{}",
                args,
                dir.display(),
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            ));
        }
        Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
    }

    pub fn config_get(dir: &Path, key: &str) -> Result<String> {
        Self::run(dir, &["config", key]).with_context(|| format!("read git config {key}"))
    }

    pub fn head(dir: &Path) -> Result<RevId> {
        Self::run(dir, &["rev-parse", "HEAD"])
    }

    pub fn reset_hard(dir: &Path, rev: &str) -> Result<()> {
        Self::run(dir, &["reset", "--hard", rev]).map(|_| ())
    }

    /// Commit time and log subject for a hash (or unambiguous hash fragment).
    /// Returns `None` when the repository does not know the hash, which is
    /// how callers probe projects for ownership of a commit.
    pub fn show(dir: &Path, hash: &str) -> Result<Option<(DateTime<Utc>, String)>> {
        let out = Command::new("git")
            .args(["show", "--no-patch", "--no-notes", "--pretty=%ci|%s", hash])
            .current_dir(dir)
            .output()
            .with_context(|| format!("run git show in {}", dir.display()))?;
        if !out.status.success() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&out.stdout);
        let line = text.lines().next().unwrap_or("");
        let (date, subject) = line
            .split_once('|')
            .ok_or_else(|| anyhow!("unexpected git show output: {line:?}"))?;
        let ts = DateTime::parse_from_str(date.trim(), "%Y-%m-%d %H:%M:%S %z")
            .with_context(|| format!("parse commit time {date:?}"))?;
        Ok(Some((ts.with_timezone(&Utc), subject.trim().to_string())))
    }

    /// Hashes reachable from `refname` with commit time inside the
    /// exclusive-exclusive `(start, end)` window, newest first. A reference
    /// the repository cannot resolve contributes nothing.
    pub fn rev_list_between(
        dir: &Path,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        refname: &str,
    ) -> Result<Vec<RevId>> {
        let after = format!("--after={}", git_datetime(start));
        let before = format!("--before={}", git_datetime(end));
        let out = Command::new("git")
            .args(["rev-list", &after, &before, refname])
            .current_dir(dir)
            .output()
            .with_context(|| format!("run git rev-list in {}", dir.display()))?;
        if !out.status.success() {
            tracing::debug!(dir = %dir.display(), refname, "rev-list failed, skipping");
            return Ok(vec![]);
        }
        Ok(String::from_utf8_lossy(&out.stdout)
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    /// The single most recent revision on `refname` at or before `t`.
    /// `Ok(None)` means the reference has no commit that old.
    pub fn rev_at_or_before(
        dir: &Path,
        t: DateTime<Utc>,
        refname: &str,
    ) -> Result<Option<RevId>> {
        let until = format!("--until={}", git_datetime(t));
        let out = Self::run(dir, &["rev-list", "--max-count=1", &until, refname])?;
        if out.is_empty() {
            return Ok(None);
        }
        Ok(Some(out))
    }
}
