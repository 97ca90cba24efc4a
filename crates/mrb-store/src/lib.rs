use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tempfile::NamedTempFile;

use mrb_core::{Session, StateError};

pub const SESSION_FILE: &str = "bisect_session.json";

/// Persists the bisection session across process invocations. Single
/// operator, single machine: atomicity comes from a temp-file rename, no
/// concurrent-writer protection is attempted.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// `control_dir` is the workspace's control-metadata directory (`.repo`).
    pub fn new(control_dir: &Path) -> Self {
        Self { path: control_dir.join(SESSION_FILE) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Err(StateError::NoSession.into());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("decode session file {}", self.path.display()))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow!("session path {} has no parent", self.path.display()))?;
        let mut tmp = NamedTempFile::new_in(dir).context("create session temp file")?;
        serde_json::to_writer_pretty(&mut tmp, session).context("encode session")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("persist {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use mrb_core::{Status, TimelineEntry, Verdict};

    fn session(n: usize) -> Session {
        Session::new(
            (0..n)
                .map(|i| TimelineEntry {
                    status: Status::Unmarked,
                    hash: format!("{i:040x}"),
                    timestamp: DateTime::from_timestamp(1_700_000_000 + i as i64 * 60, 0).unwrap(),
                    summary: format!("commit {i}"),
                })
                .collect(),
        )
    }

    #[test]
    fn round_trips_every_reachable_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let mut s = session(7);
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);

        s.first_pick();
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);

        s.advance(Verdict::Good).unwrap();
        s.advance(Verdict::Bad).unwrap();
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), s);
    }

    #[test]
    fn missing_session_tells_the_operator_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("start"));
    }

    #[test]
    fn save_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store.save(&session(3)).unwrap();
        store.save(&session(5)).unwrap();
        assert_eq!(store.load().unwrap().entries.len(), 5);
    }
}
