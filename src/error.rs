//! Error taxonomy shared by the collector, estimator and summarizer

use thiserror::Error;

/// Errors surfaced by the library
///
/// Every variant terminates the invocation except [`CommitLensError::UnknownModel`],
/// which the cost estimator recovers from by falling back to default pricing.
#[derive(Debug, Error)]
pub enum CommitLensError {
    #[error("Not in a git repository")]
    NotARepository,
    #[error("Reference '{0}' does not exist")]
    RefNotFound(String),
    #[error("Commit '{0}' does not exist in history")]
    CommitNotFound(String),
    #[error(
        "OpenAI API key not set. Set OPENAI_API_KEY in your environment or .env file, \
         or use --raw / --preview to skip the summary"
    )]
    MissingApiKey,
    #[error("No price entry for model '{0}'")]
    UnknownModel(String),
    #[error("{}", format_api_error(.status, .message))]
    ApiRequest { status: Option<u16>, message: String },
    #[error("Summary request timed out after {0}s")]
    Timeout(u64),
    #[error("`{command}` failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error("Failed to run git. Make sure git is installed and in PATH: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_api_error(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("OpenAI API request failed ({code}): {message}"),
        None => format!("OpenAI API request failed: {message}"),
    }
}

pub type Result<T> = std::result::Result<T, CommitLensError>;
