//! Prompt construction for diff summaries
//!
//! Diffs larger than the configured limit are cut down to their earliest
//! characters and tagged with [`TRUNCATION_MARKER`], so the text sent to the
//! API is always bounded.

/// Appended to a diff that was cut short
pub const TRUNCATION_MARKER: &str = "\n\n[... diff truncated ...]\n";

/// Default instructions sent as the system message
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You summarize git diffs for developers who have not read them.

Write summaries that are:
- understandable at a glance
- grouped by component, feature, or kind of change
- specific about function names, file paths, and changed parameters
- explicit about changes affecting behaviour, performance, or security

Skip whitespace-only, formatting, and comment-only edits.

Answer in Markdown: ## for section headings, **bold** for component names,
nested bullets for detail, and `code` for identifiers and paths.";

const RESPONSE_LAYOUT: &str = "\
Structure the answer as:

## Overview
One or two sentences on what changed overall.

## Key Changes
Bullets per component or feature, each with the concrete changes under it.

## Technical Details
Implementation notes, likely impact, and notable refactoring.";

/// A diff after the size limit has been applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDiff {
    pub text: String,
    pub truncated: bool,
}

/// Keep at most `max_chars` characters of `diff`, marker included
///
/// # Example
///
/// ```
/// use commitlens::prompt::{truncate_diff, TRUNCATION_MARKER};
///
/// let diff = "+".repeat(500);
/// let prompt_diff = truncate_diff(&diff, 100);
/// assert!(prompt_diff.truncated);
/// assert_eq!(prompt_diff.text.chars().count(), 100);
/// assert!(prompt_diff.text.ends_with(TRUNCATION_MARKER));
/// ```
pub fn truncate_diff(diff: &str, max_chars: usize) -> PromptDiff {
    if diff.chars().count() <= max_chars {
        return PromptDiff {
            text: diff.to_string(),
            truncated: false,
        };
    }

    let keep = max_chars.saturating_sub(TRUNCATION_MARKER.chars().count());
    let cut = diff
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(diff.len());

    let mut text = String::with_capacity(cut + TRUNCATION_MARKER.len());
    text.push_str(&diff[..cut]);
    text.push_str(TRUNCATION_MARKER);
    PromptDiff {
        text,
        truncated: true,
    }
}

/// Build the user message wrapping `diff`
///
/// The final prompt structure is:
/// ```text
/// Summarize this git diff:
///
/// {diff}
///
/// {layout instructions}
/// ```
pub fn build_user_prompt(diff: &str) -> String {
    format!("Summarize this git diff:\n\n{}\n\n{}", diff, RESPONSE_LAYOUT)
}
