//! Output structures for JSON formatting
//!
//! `--json` replaces the terminal rendering with one of these documents so the
//! result can be consumed by other programs.

use serde::Serialize;

use crate::model::{CostEstimate, DiffResult, SummaryResult};

/// JSON document printed for each output mode
///
/// # Example
///
/// ```
/// use commitlens::model::SummaryResult;
/// use commitlens::output::JsonOutput;
///
/// let output = JsonOutput::Explanation {
///     summary: &SummaryResult {
///         explanation: "Adds a login form.".to_string(),
///         truncated: false,
///     },
/// };
///
/// let json = serde_json::to_string(&output).unwrap();
/// assert_eq!(
///     json,
///     r#"{"mode":"explanation","explanation":"Adds a login form.","truncated":false}"#
/// );
/// ```
#[derive(Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum JsonOutput<'a> {
    Raw {
        #[serde(flatten)]
        result: &'a DiffResult,
    },
    Preview {
        #[serde(flatten)]
        estimate: &'a CostEstimate,
        commits: &'a [crate::model::CommitInfo],
        commit_count: usize,
        files_changed: usize,
        lines_added: usize,
        lines_deleted: usize,
    },
    Explanation {
        #[serde(flatten)]
        summary: &'a SummaryResult,
    },
}

impl<'a> JsonOutput<'a> {
    pub fn preview(result: &'a DiffResult, estimate: &'a CostEstimate) -> Self {
        JsonOutput::Preview {
            estimate,
            commits: &result.commits,
            commit_count: result.commit_count,
            files_changed: result.stats.files_changed,
            lines_added: result.stats.lines_added,
            lines_deleted: result.stats.lines_deleted,
        }
    }
}
