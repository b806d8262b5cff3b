//! CommitLens - natural-language summaries of git changes
//!
//! This library collects diffs from git, estimates what it would cost to send
//! them to a language model, asks an OpenAI-compatible API for a summary, and
//! renders the result for a terminal.
//!
//! # Modules
//!
//! - [`git`] - Diff, log and stat collection via the `git` binary
//! - [`cost`] - Approximate token counts and per-model pricing
//! - [`prompt`] - Prompt assembly and truncation
//! - [`openai`] - The [`openai::Summarizer`] trait and its HTTP client
//! - [`render`] - Terminal rendering of raw, preview and explanation output
//! - [`output`] - JSON output shapes
//! - [`app`] - The end-to-end pipeline
//! - [`config`] - Configuration file and environment loading
//!
//! # Example
//!
//! ```no_run
//! use commitlens::{app, config::Config, git::GitCli, openai::OpenAiClient};
//! use commitlens::model::{DiffMode, DiffRequest, OutputMode};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::load(None)?;
//! let request = DiffRequest {
//!     mode: DiffMode::Compare { branch: "feature".into(), base: "main".into() },
//!     output: OutputMode::Preview,
//!     color: false,
//!     json: false,
//! };
//! let text = app::execute(&request, &config, &GitCli::new("."), &OpenAiClient::new(&config)).await?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod config;
pub mod cost;
pub mod error;
pub mod git;
pub mod logging;
pub mod model;
pub mod openai;
pub mod output;
pub mod prompt;
pub mod render;

pub use error::{CommitLensError, Result};
