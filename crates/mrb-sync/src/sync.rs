use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use mrb_manifest::pinned_xml;
use mrb_vcs::GitBackend;

use crate::util::{display_time, run_cmd};
use crate::Workspace;

impl Workspace {
    /// Resynchronize the whole workspace to the state every project held at
    /// instant `t`.
    ///
    /// The manifest working copy is temporarily reset to its own revision as
    /// of `t` so the project list matches the era being materialized, and is
    /// restored to its prior revision on every exit path. A failed
    /// full-workspace sync is reported but does not abort that restoration.
    pub fn sync_to_instant(&self, t: DateTime<Utc>, hash: &str) -> Result<()> {
        println!("bisect: sync to {} ({})", display_time(t), hash);

        let manifests_dir = self.manifests_dir();
        let remote = GitBackend::config_get(&manifests_dir, "branch.default.remote")?;
        let merge = GitBackend::config_get(&manifests_dir, "branch.default.merge")?;
        let branch = merge.rsplit('/').next().unwrap_or(merge.as_str());
        let tracking = format!("{remote}/{branch}");

        let prev = GitBackend::head(&manifests_dir)?;
        let manifest_rev = GitBackend::rev_at_or_before(&manifests_dir, t, &tracking)?
            .ok_or_else(|| anyhow!("no manifest revision at or before {}", display_time(t)))?;
        GitBackend::reset_hard(&manifests_dir, &manifest_rev)?;

        let outcome = self.pin_and_sync(t);

        GitBackend::reset_hard(&manifests_dir, &prev)
            .context("restore manifest working copy")?;
        outcome
    }

    fn pin_and_sync(&self, t: DateTime<Utc>) -> Result<()> {
        // the manifest now in effect, after the temporary reset above
        let manifest = self.manifest()?;

        let mut pins = HashMap::new();
        for project in &manifest.projects {
            let refname = match project.tracking_ref(&manifest) {
                Ok(r) => r,
                Err(err) => {
                    tracing::warn!(project = %project.name, %err, "no usable reference, leaving unpinned");
                    continue;
                }
            };
            let dir = self.project_git_dir(project);
            match GitBackend::rev_at_or_before(&dir, t, &refname) {
                Ok(Some(rev)) => {
                    pins.insert(project.effective_path().to_string(), rev);
                }
                Ok(None) => {
                    tracing::warn!(project = %project.name, "no revision at or before target, leaving unpinned");
                }
                Err(err) => {
                    tracing::warn!(project = %project.name, err = %format!("{err:#}"), "revision lookup failed, leaving unpinned");
                }
            }
        }

        let snapshot_path = self.manifests_dir().join(format!("bisect-{}.xml", display_time(t)));
        std::fs::write(&snapshot_path, pinned_xml(&manifest, &pins))
            .with_context(|| format!("write {}", snapshot_path.display()))?;

        // Both `repo manifest` and `repo sync -m` pick up local manifests, so
        // they must be out of the way while the derived manifest is applied.
        let _local = LocalManifestsGuard::hide(&self.control_dir())?;
        let snapshot_arg = snapshot_path.to_string_lossy();
        if let Err(err) = run_cmd(&self.root, "repo", &["sync", "-l", "-m", &snapshot_arg]) {
            eprintln!("Failed to sync");
            tracing::warn!(err = %format!("{err:#}"), "repo sync failed");
        }
        Ok(())
    }
}

/// Moves `.repo/local_manifests` aside for the duration of a sync. The rename
/// is undone on drop, so operator-supplied overrides come back even when the
/// sync itself fails.
struct LocalManifestsGuard {
    live: PathBuf,
    hidden: PathBuf,
    active: bool,
}

impl LocalManifestsGuard {
    fn hide(control_dir: &Path) -> Result<Self> {
        let live = control_dir.join("local_manifests");
        let hidden = control_dir.join("local_manifests.hide");
        let active = live.exists();
        if active {
            std::fs::rename(&live, &hidden).context("hide local_manifests")?;
        }
        Ok(Self { live, hidden, active })
    }
}

impl Drop for LocalManifestsGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = std::fs::rename(&self.hidden, &self.live);
        }
    }
}
