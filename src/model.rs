//! Request and result types passed between the pipeline stages

use serde::Serialize;

/// Which slice of history to collect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffMode {
    /// Changes on `branch` since it diverged from `base`
    Compare { branch: String, base: String },
    /// Uncommitted changes, or everything from `from` up to HEAD
    Summary { from: Option<String> },
}

/// What to do with the collected diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Print the diff and its stats, no summarizer
    Raw,
    /// Print stats, token count and cost, no summarizer
    Preview,
    /// Ask the summarizer for a natural-language explanation
    Explain,
}

/// One invocation's worth of user input. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct DiffRequest {
    pub mode: DiffMode,
    pub output: OutputMode,
    pub color: bool,
    pub json: bool,
}

/// A single commit as reported by `git log`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitInfo {
    pub hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
}

impl CommitInfo {
    /// Abbreviated `hash subject` form used in listings
    pub fn oneline(&self) -> String {
        let short = self.hash.get(..7).unwrap_or(&self.hash);
        format!("{} {}", short, self.message)
    }
}

/// Line and file counts as reported by `git diff --shortstat`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

impl DiffStats {
    pub fn is_empty(&self) -> bool {
        self.files_changed == 0 && self.lines_added == 0 && self.lines_deleted == 0
    }
}

impl std::ops::Add for DiffStats {
    type Output = DiffStats;

    fn add(self, other: DiffStats) -> DiffStats {
        DiffStats {
            files_changed: self.files_changed + other.files_changed,
            lines_added: self.lines_added + other.lines_added,
            lines_deleted: self.lines_deleted + other.lines_deleted,
        }
    }
}

/// Everything the collector learned about one range of history
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiffResult {
    pub commits: Vec<CommitInfo>,
    /// Commits inside the range; `commits` may also list the starting commit
    pub commit_count: usize,
    #[serde(flatten)]
    pub stats: DiffStats,
    #[serde(rename = "diff")]
    pub raw_diff: String,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.raw_diff.trim().is_empty()
    }
}

/// Approximate token count and dollar cost of sending a diff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub token_count: usize,
    pub estimated_output_tokens: usize,
    pub model_id: String,
    pub estimated_cost_usd: f64,
    /// True when the model had no price entry and the default rate was used
    pub default_pricing: bool,
}

/// The summarizer's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub explanation: String,
    /// The diff was cut down to the prompt size limit before sending
    pub truncated: bool,
}
