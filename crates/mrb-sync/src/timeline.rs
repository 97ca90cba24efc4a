use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

use mrb_core::{Session, Status, TimelineEntry};
use mrb_vcs::GitBackend;

use crate::Workspace;

impl Workspace {
    /// Enumerate every commit in every project whose commit time falls inside
    /// the exclusive `(start, end)` window, merge them into one
    /// timestamp-ordered timeline, seed the newest entry as bad and persist
    /// the session.
    pub fn build_timeline(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Session> {
        let manifest = self.manifest()?;
        let mut entries = Vec::new();
        for project in &manifest.projects {
            let refname = project.tracking_ref(&manifest)?;
            let dir = self.project_git_dir(project);
            let hashes = GitBackend::rev_list_between(&dir, start, end, &refname)?;
            tracing::debug!(project = %project.name, commits = hashes.len(), "scanned");
            for hash in hashes {
                if let Some((timestamp, summary)) = GitBackend::show(&dir, &hash)? {
                    entries.push(TimelineEntry {
                        status: Status::Unmarked,
                        hash,
                        timestamp,
                        summary,
                    });
                }
            }
        }
        let session = assemble(entries)?;
        self.store.save(&session)?;
        Ok(session)
    }
}

/// Sort the merged timeline and seed it. Ties keep their discovery order
/// (stable sort), so equal timestamps stay grouped by manifest order.
fn assemble(mut entries: Vec<TimelineEntry>) -> Result<Session> {
    entries.sort_by_key(|e| e.timestamp);
    if entries.len() < 3 {
        return Err(anyhow!("less than 3 revisions between dates, not useful data"));
    }
    Ok(Session::new(entries))
}
