//! Terminal rendering for raw diffs, previews and explanations
//!
//! Each function returns the finished text; printing is left to the caller.

use colored::Colorize;
use std::fmt::Write;

use crate::model::{CostEstimate, DiffResult, DiffStats, SummaryResult};

/// Commits listed in a preview before the rest are elided
pub const MAX_PREVIEW_COMMITS: usize = 20;

const RULE_WIDTH: usize = 80;

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{count} {word}")
    } else {
        format!("{count} {word}s")
    }
}

/// Frame `body` between two horizontal rules
pub fn framed(body: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("\n{rule}\n\n{}\n\n{rule}\n", body.trim_end())
}

/// The `Summary:` block listing commits, files and line counts
///
/// The commit line is omitted when `show_commits` is false.
pub fn stats_block(commit_count: usize, stats: &DiffStats, show_commits: bool) -> String {
    let mut out = String::from("Summary:\n");
    if show_commits {
        let _ = writeln!(out, "- {}", plural(commit_count, "commit"));
    }
    let _ = writeln!(out, "- {} changed", plural(stats.files_changed, "file"));
    let _ = writeln!(out, "- {}(+)", plural(stats.lines_added, "insertion"));
    let _ = write!(out, "- {}(-)", plural(stats.lines_deleted, "deletion"));
    out
}

/// Diff text verbatim followed by the stats block
pub fn render_raw(result: &DiffResult, show_commits: bool) -> String {
    let mut out = String::new();
    if result.is_empty() {
        out.push_str("No changes found.\n");
    } else {
        out.push_str(result.raw_diff.trim_end());
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&stats_block(result.commit_count, &result.stats, show_commits));
    framed(&out)
}

/// Token count, cost and commit list, without contacting the API
pub fn render_preview(result: &DiffResult, estimate: &CostEstimate, show_commits: bool) -> String {
    let mut out = String::from("Preview of sending this diff to OpenAI:\n\n");
    let _ = writeln!(
        out,
        "- The diff contains approximately {} tokens",
        estimate.token_count
    );
    let pricing = if estimate.default_pricing {
        format!("no price listed for {}, using default rates", estimate.model_id)
    } else {
        format!("based on {} pricing", estimate.model_id)
    };
    let _ = writeln!(
        out,
        "- Estimated cost: ${:.6} ({})",
        estimate.estimated_cost_usd, pricing
    );

    if !result.commits.is_empty() {
        let _ = writeln!(out, "\nCommits ({}):", result.commits.len());
        for commit in result.commits.iter().take(MAX_PREVIEW_COMMITS) {
            let _ = writeln!(out, "- {}", commit.oneline());
        }
        if result.commits.len() > MAX_PREVIEW_COMMITS {
            let _ = writeln!(
                out,
                "- ... and {} more commits",
                result.commits.len() - MAX_PREVIEW_COMMITS
            );
        }
    }

    out.push('\n');
    out.push_str(&stats_block(result.commit_count, &result.stats, show_commits));
    framed(&out)
}

/// The model's explanation, highlighted as Markdown when `color` is set
pub fn render_explanation(summary: &SummaryResult, color: bool) -> String {
    let mut body = if color {
        highlight_markdown(&summary.explanation)
    } else {
        summary.explanation.clone()
    };
    if summary.truncated {
        let note = "Note: the diff exceeded the prompt size limit and was truncated before summarizing.";
        body.push_str("\n\n");
        if color {
            body.push_str(&note.dimmed().to_string());
        } else {
            body.push_str(note);
        }
    }
    framed(&body)
}

/// Apply terminal styling to headings, code, emphasis and bullets
pub fn highlight_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        let styled = if trimmed.starts_with("```") {
            in_fence = !in_fence;
            line.dimmed().to_string()
        } else if in_fence {
            line.yellow().to_string()
        } else if trimmed.starts_with('#') {
            trimmed.trim_start_matches('#').trim().bold().cyan().to_string()
        } else {
            highlight_bullet(line)
        };
        out.push_str(&styled);
        out.push('\n');
    }

    out.truncate(out.trim_end_matches('\n').len());
    out
}

fn highlight_bullet(line: &str) -> String {
    let indent = line.len() - line.trim_start().len();
    let (lead, rest) = line.split_at(indent);
    for marker in ["- ", "* ", "• "] {
        if let Some(content) = rest.strip_prefix(marker) {
            return format!(
                "{}{}{}",
                lead,
                marker.green(),
                highlight_inline(content)
            );
        }
    }
    format!("{}{}", lead, highlight_inline(rest))
}

/// Style `**bold**` and `` `code` `` spans; unbalanced markers are left as-is
fn highlight_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    loop {
        let bold = rest.find("**");
        let code = rest.find('`');
        let (start, delim) = match (bold, code) {
            (Some(b), Some(c)) if c < b => (c, "`"),
            (Some(b), _) => (b, "**"),
            (None, Some(c)) => (c, "`"),
            (None, None) => break,
        };

        let after = &rest[start + delim.len()..];
        let Some(end) = after.find(delim) else {
            break;
        };

        out.push_str(&rest[..start]);
        let span = &after[..end];
        if delim == "`" {
            out.push_str(&span.yellow().to_string());
        } else {
            out.push_str(&span.bold().to_string());
        }
        rest = &after[end + delim.len()..];
    }

    out.push_str(rest);
    out
}
