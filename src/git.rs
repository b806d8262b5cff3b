//! Git operations for diff collection
//!
//! This module shells out to the `git` binary to gather:
//! - unified diff text for a branch comparison or a commit range
//! - the commits in that range
//! - `--shortstat` statistics for the same range
//!
//! Nothing here modifies the repository.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

use crate::error::{CommitLensError, Result};
use crate::model::{CommitInfo, DiffResult, DiffStats};

const FIELD_SEP: char = '\u{1f}';
const RECORD_SEP: char = '\u{1e}';
const LOG_FORMAT: &str = "--format=%H%x1f%an%x1f%aI%x1f%s%x1e";

/// Thin wrapper around the `git` command line, rooted at one working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Run `git args...` and return stdout, failing on a non-zero exit
    fn run(&self, args: &[&str]) -> Result<String> {
        debug!(?args, dir = %self.repo_dir.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()?;

        if !output.status.success() {
            return Err(CommitLensError::Git {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run `git args...` and report only whether it exited successfully
    fn succeeds(&self, args: &[&str]) -> Result<bool> {
        let status = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .output()?
            .status;
        Ok(status.success())
    }

    pub fn is_repository(&self) -> Result<bool> {
        self.succeeds(&["rev-parse", "--is-inside-work-tree"])
    }

    /// Fail with [`CommitLensError::NotARepository`] outside a work tree
    pub fn ensure_repository(&self) -> Result<()> {
        if self.is_repository()? {
            Ok(())
        } else {
            Err(CommitLensError::NotARepository)
        }
    }

    /// Name of the checked-out branch (`HEAD` when detached)
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    /// Whether `reference` names a commit (branch, tag or hash)
    pub fn ref_exists(&self, reference: &str) -> Result<bool> {
        let rev = format!("{reference}^{{commit}}");
        self.succeeds(&["rev-parse", "--verify", "--quiet", &rev])
    }

    /// Whether `hash` is a commit object in this repository
    pub fn commit_exists(&self, hash: &str) -> Result<bool> {
        if !self.succeeds(&["cat-file", "-e", hash])? {
            return Ok(false);
        }
        Ok(self.run(&["cat-file", "-t", hash])?.trim() == "commit")
    }

    fn diff(&self, extra: &[&str]) -> Result<String> {
        let mut args = vec!["diff"];
        args.extend_from_slice(extra);
        self.run(&args)
    }

    fn shortstat(&self, extra: &[&str]) -> Result<DiffStats> {
        let mut args = vec!["diff", "--shortstat"];
        args.extend_from_slice(extra);
        Ok(parse_shortstat(&self.run(&args)?))
    }

    fn log(&self, extra: &[&str]) -> Result<Vec<CommitInfo>> {
        let mut args = vec!["log", LOG_FORMAT];
        args.extend_from_slice(extra);
        Ok(parse_log(&self.run(&args)?))
    }

    /// Changes on `branch` since it diverged from `base`
    ///
    /// The commit list is `base..branch`: commits made on `base` after the
    /// branch point are left out, as they are from the diff.
    ///
    /// # Errors
    ///
    /// * [`CommitLensError::RefNotFound`] if either reference does not resolve
    /// * [`CommitLensError::Git`] if any git invocation fails
    pub fn collect_compare(&self, branch: &str, base: &str) -> Result<DiffResult> {
        for reference in [branch, base] {
            if !self.ref_exists(reference)? {
                return Err(CommitLensError::RefNotFound(reference.to_string()));
            }
        }

        let range = format!("{base}...{branch}");
        let raw_diff = self.diff(&[&range])?;
        let stats = self.shortstat(&[&range])?;
        // Only the branch side, matching the merge-base diff
        let commits = self.log(&[&format!("{base}..{branch}")])?;

        Ok(DiffResult {
            commit_count: commits.len(),
            commits,
            stats,
            raw_diff,
        })
    }

    /// Uncommitted changes, or everything from `from` up to HEAD
    ///
    /// Without `from`, staged and unstaged diffs are gathered separately and
    /// joined under `# Staged Changes` / `# Unstaged Changes` headings. With
    /// `from`, the commit list covers `from..HEAD` plus `from` itself, while
    /// `commit_count` covers only `from..HEAD`.
    ///
    /// # Errors
    ///
    /// * [`CommitLensError::CommitNotFound`] if `from` is not a commit
    /// * [`CommitLensError::Git`] if any git invocation fails
    pub fn collect_summary(&self, from: Option<&str>) -> Result<DiffResult> {
        match from {
            Some(hash) => self.collect_from_commit(hash),
            None => self.collect_uncommitted(),
        }
    }

    fn collect_from_commit(&self, hash: &str) -> Result<DiffResult> {
        if !self.commit_exists(hash)? {
            return Err(CommitLensError::CommitNotFound(hash.to_string()));
        }

        let range = format!("{hash}..HEAD");
        let raw_diff = self.diff(&[&range])?;
        let stats = self.shortstat(&[&range])?;
        let mut commits = self.log(&[&range])?;
        let commit_count = commits.len();
        commits.extend(self.log(&["-n", "1", hash])?);

        Ok(DiffResult {
            commits,
            commit_count,
            stats,
            raw_diff,
        })
    }

    fn collect_uncommitted(&self) -> Result<DiffResult> {
        let staged = self.diff(&["--staged"])?;
        let unstaged = self.diff(&[])?;
        let stats = self.shortstat(&["--staged"])? + self.shortstat(&[])?;

        let mut raw_diff = String::new();
        if !staged.is_empty() {
            raw_diff.push_str("# Staged Changes\n");
            raw_diff.push_str(&staged);
        }
        if !unstaged.is_empty() {
            if !raw_diff.is_empty() {
                raw_diff.push('\n');
            }
            raw_diff.push_str("# Unstaged Changes\n");
            raw_diff.push_str(&unstaged);
        }

        Ok(DiffResult {
            commits: Vec::new(),
            commit_count: 0,
            stats,
            raw_diff,
        })
    }
}

/// Parse `git diff --shortstat` output
///
/// # Example
///
/// ```
/// use commitlens::git::parse_shortstat;
///
/// let stats = parse_shortstat(" 3 files changed, 10 insertions(+), 2 deletions(-)\n");
/// assert_eq!(stats.files_changed, 3);
/// assert_eq!(stats.lines_added, 10);
/// assert_eq!(stats.lines_deleted, 2);
/// ```
pub fn parse_shortstat(output: &str) -> DiffStats {
    let mut stats = DiffStats::default();
    for part in output.trim().split(", ") {
        let mut words = part.split_whitespace();
        let Some(count) = words.next().and_then(|n| n.parse::<usize>().ok()) else {
            continue;
        };
        match words.next() {
            Some(word) if word.starts_with("file") => stats.files_changed = count,
            Some(word) if word.starts_with("insertion") => stats.lines_added = count,
            Some(word) if word.starts_with("deletion") => stats.lines_deleted = count,
            _ => {}
        }
    }
    stats
}

/// Parse `git log` output with unit-separated fields and record-separated commits
pub fn parse_log(output: &str) -> Vec<CommitInfo> {
    output
        .split(RECORD_SEP)
        .map(str::trim)
        .filter(|record| !record.is_empty())
        .filter_map(|record| {
            let mut fields = record.splitn(4, FIELD_SEP);
            Some(CommitInfo {
                hash: fields.next()?.to_string(),
                author: fields.next()?.to_string(),
                date: fields.next()?.to_string(),
                message: fields.next()?.to_string(),
            })
        })
        .collect()
}


// Collector behaviour against real repositories is covered in tests/collector.rs.
