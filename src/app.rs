//! The collect → estimate/summarize → render pipeline
//!
//! The output mode is fixed before collection starts; raw and preview runs
//! never reach the summarizer.

use tracing::{info, warn};

use crate::config::Config;
use crate::cost::estimate;
use crate::error::Result;
use crate::git::GitCli;
use crate::model::{DiffMode, DiffRequest, DiffResult, OutputMode};
use crate::openai::Summarizer;
use crate::output::JsonOutput;
use crate::render::{render_explanation, render_preview, render_raw};

/// Collect the diff described by `mode`
pub fn collect(git: &GitCli, mode: &DiffMode) -> Result<DiffResult> {
    match mode {
        DiffMode::Compare { branch, base } => {
            info!("comparing {branch} to {base}");
            git.collect_compare(branch, base)
        }
        DiffMode::Summary { from: Some(hash) } => {
            info!("analyzing changes from commit {hash} to HEAD");
            git.collect_summary(Some(hash))
        }
        DiffMode::Summary { from: None } => {
            info!("analyzing uncommitted changes");
            git.collect_summary(None)
        }
    }
}

/// Run one request end to end and return the text to print
///
/// Nothing is returned on failure, so callers never print partial output.
pub async fn execute<S: Summarizer>(
    request: &DiffRequest,
    config: &Config,
    git: &GitCli,
    summarizer: &S,
) -> Result<String> {
    let result = collect(git, &request.mode)?;
    info!(
        files = result.stats.files_changed,
        added = result.stats.lines_added,
        deleted = result.stats.lines_deleted,
        commits = result.commit_count,
        "collected diff"
    );

    let show_commits = match &request.mode {
        DiffMode::Compare { .. } => true,
        DiffMode::Summary { from: Some(_) } => result.commit_count > 0,
        DiffMode::Summary { from: None } => false,
    };

    match request.output {
        OutputMode::Raw => {
            if request.json {
                return Ok(serde_json::to_string_pretty(&JsonOutput::Raw { result: &result })?);
            }
            Ok(render_raw(&result, show_commits))
        }
        OutputMode::Preview => {
            let estimate = estimate(&result.raw_diff, &config.model, &config.prices);
            if request.json {
                return Ok(serde_json::to_string_pretty(&JsonOutput::preview(
                    &result, &estimate,
                ))?);
            }
            Ok(render_preview(&result, &estimate, show_commits))
        }
        OutputMode::Explain => {
            let estimate = estimate(&result.raw_diff, &config.model, &config.prices);
            if estimate.token_count > config.token_warning_threshold {
                warn!(
                    "the diff contains about {} tokens, above the recommended limit of {}",
                    estimate.token_count, config.token_warning_threshold
                );
            } else {
                info!("the diff contains about {} tokens", estimate.token_count);
            }

            let api_key = config.api_key.as_deref().unwrap_or_default();
            let summary = summarizer
                .summarize(&result.raw_diff, &config.model, api_key)
                .await?;

            if request.json {
                return Ok(serde_json::to_string_pretty(&JsonOutput::Explanation {
                    summary: &summary,
                })?);
            }
            Ok(render_explanation(&summary, request.color))
        }
    }
}
