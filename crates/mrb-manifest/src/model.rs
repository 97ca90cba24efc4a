use anyhow::{anyhow, Result};

/// A remote declaration. Carried through to derived manifests verbatim so the
/// sync tool can still resolve fetch URLs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remote {
    pub name: String,
    pub fetch: Option<String>,
    pub review: Option<String>,
}

/// One project aggregated by the manifest. `path` defaults to `name` when the
/// manifest leaves it unset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub path: Option<String>,
    pub remote: Option<String>,
    pub revision: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Manifest {
    pub remotes: Vec<Remote>,
    pub default_remote: Option<String>,
    pub default_revision: Option<String>,
    pub projects: Vec<Project>,
}

impl Project {
    pub fn effective_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    /// Resolve the reference this project tracks: the per-project revision
    /// override when present, else the manifest-wide default. Tags resolve to
    /// the bare tag name; branches resolve to `remote/branch`.
    pub fn tracking_ref(&self, manifest: &Manifest) -> Result<String> {
        let revision = self
            .revision
            .as_deref()
            .or(manifest.default_revision.as_deref())
            .ok_or_else(|| {
                anyhow!("project {} has no revision and the manifest has no default", self.name)
            })?;
        if let Some(tag) = revision.strip_prefix("refs/tags/") {
            return Ok(tag.to_string());
        }
        let branch = revision.strip_prefix("refs/heads/").unwrap_or(revision);
        let remote = self
            .remote
            .as_deref()
            .or(manifest.default_remote.as_deref())
            .ok_or_else(|| {
                anyhow!("project {} has no remote and the manifest has no default", self.name)
            })?;
        Ok(format!("{remote}/{branch}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> Manifest {
        Manifest {
            remotes: vec![],
            default_remote: Some("origin".into()),
            default_revision: Some("refs/heads/main".into()),
            projects: vec![],
        }
    }

    fn project(name: &str) -> Project {
        Project { name: name.into(), path: None, remote: None, revision: None }
    }

    #[test]
    fn default_branch_resolves_to_remote_slash_branch() {
        let p = project("platform/build");
        assert_eq!(p.tracking_ref(&manifest()).unwrap(), "origin/main");
    }

    #[test]
    fn project_overrides_win_over_defaults() {
        let mut p = project("vendor/widget");
        p.remote = Some("vendor".into());
        p.revision = Some("release".into());
        assert_eq!(p.tracking_ref(&manifest()).unwrap(), "vendor/release");
    }

    #[test]
    fn tag_revisions_resolve_to_the_bare_tag() {
        let mut p = project("kernel");
        p.revision = Some("refs/tags/v5.10".into());
        assert_eq!(p.tracking_ref(&manifest()).unwrap(), "v5.10");
    }

    #[test]
    fn missing_defaults_are_an_error() {
        let p = project("orphan");
        assert!(p.tracking_ref(&Manifest::default()).is_err());
    }

    #[test]
    fn path_defaults_to_name() {
        let mut p = project("platform/art");
        assert_eq!(p.effective_path(), "platform/art");
        p.path = Some("art".into());
        assert_eq!(p.effective_path(), "art");
    }
}
