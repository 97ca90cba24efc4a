use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use mrb_manifest::{parse_manifest, Manifest, Project};
use mrb_store::SessionStore;

use crate::util::run_cmd;

/// A multi-repository workspace: the directory holding the `.repo` control
/// tree. All manifest and per-project git state lives underneath it.
pub struct Workspace {
    pub root: PathBuf,
    pub store: SessionStore,
}

impl Workspace {
    pub fn open(root: PathBuf) -> Result<Self> {
        let control = root.join(".repo");
        if !control.exists() {
            return Err(anyhow!("not a repo workspace: {} has no .repo directory", root.display()));
        }
        let store = SessionStore::new(&control);
        Ok(Self { root, store })
    }

    pub fn control_dir(&self) -> PathBuf {
        self.root.join(".repo")
    }

    /// Working copy of the manifest repository itself.
    pub fn manifests_dir(&self) -> PathBuf {
        self.control_dir().join("manifests")
    }

    /// Bare metadata directory for one project's clone.
    pub fn project_git_dir(&self, project: &Project) -> PathBuf {
        self.control_dir()
            .join("projects")
            .join(format!("{}.git", project.effective_path()))
    }

    /// The manifest currently in effect, as reported by the listing service.
    pub fn manifest(&self) -> Result<Manifest> {
        let xml = run_cmd(&self.root, "repo", &["manifest"])
            .context("read manifest via `repo manifest`")?;
        parse_manifest(&xml)
    }
}
