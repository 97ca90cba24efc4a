use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDateTime, Utc};

use mrb_vcs::GitBackend;

use crate::util::{display_time, DISPLAY_FORMAT};
use crate::Workspace;

impl Workspace {
    /// Resolve an operator-supplied bound: either a strict timestamp, used
    /// verbatim, or a commit-hash fragment looked up across every project in
    /// manifest order until one of them knows it (first match wins).
    pub fn resolve_bound(&self, ident: &str) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(ident, DISPLAY_FORMAT) {
            return Ok(naive.and_utc());
        }

        let hash = trailing_hash(ident)
            .ok_or_else(|| anyhow!("{ident} is neither a timestamp nor a commit hash"))?;
        let manifest = self.manifest()?;
        for project in &manifest.projects {
            let dir = self.project_git_dir(project);
            if let Some((time, _)) = GitBackend::show(&dir, hash)? {
                println!("Found commit hash {} at time {}", hash, display_time(time));
                return Ok(time);
            }
        }
        println!("Could not find {ident} commit hash");
        Err(anyhow!("commit hash {ident} not found in any project"))
    }
}

/// Strip any non-hash prefix, leaving the trailing alphanumeric run as the
/// candidate hash (so pasted identifiers like `Change-Id:I3f2...` still work).
fn trailing_hash(ident: &str) -> Option<&str> {
    let bytes = ident.as_bytes();
    let mut start = ident.len();
    while start > 0 {
        let c = bytes[start - 1];
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            start -= 1;
        } else {
            break;
        }
    }
    if start == ident.len() {
        None
    } else {
        Some(&ident[start..])
    }
}
