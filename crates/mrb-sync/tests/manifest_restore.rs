use std::path::Path;
use std::process::Command;

use chrono::{DateTime, Utc};

use mrb_sync::Workspace;
use mrb_vcs::GitBackend;

const T1: i64 = 1_700_000_000;
const T2: i64 = 1_700_003_600;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn git(dir: &Path, args: &[&str], date: Option<i64>) {
    let mut cmd = Command::new("git");
    cmd.args(args).current_dir(dir);
    if let Some(secs) = date {
        let stamp = format!("{secs} +0000");
        cmd.env("GIT_AUTHOR_DATE", &stamp).env("GIT_COMMITTER_DATE", &stamp);
    }
    let out = cmd.output().unwrap();
    assert!(out.status.success(), "git {:?}: {}", args, String::from_utf8_lossy(&out.stderr));
}

/// A minimal `.repo` tree whose manifests working copy has two commits and
/// the tracking config the synchronizer reads.
fn fixture_workspace(root: &Path) {
    let manifests = root.join(".repo").join("manifests");
    std::fs::create_dir_all(&manifests).unwrap();
    git(&manifests, &["init"], None);
    git(&manifests, &["config", "user.email", "mrb@example.com"], None);
    git(&manifests, &["config", "user.name", "mrb"], None);
    git(&manifests, &["config", "commit.gpgsign", "false"], None);
    std::fs::write(manifests.join("default.xml"), "<manifest/>").unwrap();
    git(&manifests, &["add", "."], None);
    git(&manifests, &["commit", "-m", "manifest v1"], Some(T1));
    std::fs::write(manifests.join("default.xml"), "<manifest></manifest>").unwrap();
    git(&manifests, &["add", "."], None);
    git(&manifests, &["commit", "-m", "manifest v2"], Some(T2));

    // mirror the tracking setup a real manifest checkout has
    let out = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .current_dir(&manifests)
        .output()
        .unwrap();
    let branch = String::from_utf8_lossy(&out.stdout).trim().to_string();
    git(&manifests, &["config", "branch.default.remote", "origin"], None);
    git(
        &manifests,
        &["config", "branch.default.merge", &format!("refs/heads/{branch}")],
        None,
    );
    git(
        &manifests,
        &["update-ref", &format!("refs/remotes/origin/{branch}"), "HEAD"],
        None,
    );
}

#[test]
fn manifest_working_copy_is_restored_when_the_sync_fails() {
    let dir = tempfile::tempdir().unwrap();
    fixture_workspace(dir.path());
    let manifests = dir.path().join(".repo").join("manifests");
    let before = GitBackend::head(&manifests).unwrap();

    let ws = Workspace::open(dir.path().to_path_buf()).unwrap();
    // the manifest listing service is unavailable in this fixture, so the
    // inner sync step cannot succeed
    let result = ws.sync_to_instant(at(T1 + 5), "cafe1234");
    assert!(result.is_err());

    assert_eq!(GitBackend::head(&manifests).unwrap(), before);
}

#[test]
fn sync_before_any_manifest_revision_fails_without_touching_the_checkout() {
    let dir = tempfile::tempdir().unwrap();
    fixture_workspace(dir.path());
    let manifests = dir.path().join(".repo").join("manifests");
    let before = GitBackend::head(&manifests).unwrap();

    let ws = Workspace::open(dir.path().to_path_buf()).unwrap();
    let result = ws.sync_to_instant(at(T1 - 100), "cafe1234");
    assert!(result.is_err());
    assert_eq!(GitBackend::head(&manifests).unwrap(), before);
}

#[test]
fn open_rejects_directories_without_a_control_tree() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Workspace::open(dir.path().to_path_buf()).is_err());
}
