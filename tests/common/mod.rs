#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use commitlens::git::GitCli;
use tempfile::TempDir;

/// A throw-away git repository on branch `main`
pub struct TempRepo {
    dir: TempDir,
}

impl TempRepo {
    pub fn new() -> Self {
        let repo = TempRepo {
            dir: tempfile::tempdir().unwrap(),
        };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo.git(&["config", "user.name", "Test User"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cli(&self) -> GitCli {
        GitCli::new(self.path())
    }

    /// Run git in the repository, panicking on failure
    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(self.path())
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }

    pub fn write(&self, name: &str, contents: &str) {
        fs::write(self.path().join(name), contents).unwrap();
    }

    /// Stage everything and commit, returning the new hash
    pub fn commit_all(&self, message: &str) -> String {
        self.git(&["add", "-A"]);
        self.git(&["commit", "-q", "-m", message]);
        self.git(&["rev-parse", "HEAD"])
    }

    /// `main` with one file, and `feature` adding two commits on top
    pub fn with_feature_branch() -> Self {
        let repo = TempRepo::new();
        repo.write("app.txt", "alpha\nbeta\ngamma\n");
        repo.commit_all("Initial commit");

        repo.git(&["checkout", "-q", "-b", "feature"]);
        repo.write("app.txt", "alpha\nBETA\ngamma\ndelta\n");
        repo.commit_all("Rework app");
        repo.write("notes.txt", "one\ntwo\n");
        repo.commit_all("Add notes");
        repo.git(&["checkout", "-q", "main"]);
        repo
    }
}

/// Files, added and deleted lines counted straight from unified diff text
pub fn count_patch(diff: &str) -> (usize, usize, usize) {
    let mut files = 0;
    let mut added = 0;
    let mut deleted = 0;
    for line in diff.lines() {
        if line.starts_with("diff --git ") {
            files += 1;
        } else if line.starts_with("+++ ") || line.starts_with("--- ") {
            continue;
        } else if line.starts_with('+') {
            added += 1;
        } else if line.starts_with('-') {
            deleted += 1;
        }
    }
    (files, added, deleted)
}
