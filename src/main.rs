//! CLI that explains git changes in plain language
//!
//! Compares branches or summarizes uncommitted / recent work, optionally
//! previewing token count and cost before anything is sent to OpenAI.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::{Duration, sleep};

use commitlens::{
    app,
    config::Config,
    git::GitCli,
    logging::init_logging,
    model::{DiffMode, DiffRequest, OutputMode, SummaryResult},
    openai::{OpenAiClient, Summarizer},
};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "commitlens", version)]
#[command(about = "Explain git changes in natural language using OpenAI", long_about = None)]
#[command(after_help = "Examples:
  commitlens compare feature-branch
  commitlens compare feature-branch main --preview
  commitlens summary
  commitlens summary --from 797b3398a --raw")]
struct Cli {
    /// Path to a configuration file (TOML format)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Model to use, overriding OPENAI_MODEL and the config file
    #[arg(long, global = true, value_parser = non_blank_model)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn non_blank_model(value: &str) -> std::result::Result<String, String> {
    let model = value.trim();
    if model.is_empty() {
        return Err("model cannot be empty".to_string());
    }
    Ok(model.to_string())
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a branch against a base branch
    Compare {
        /// Branch to inspect
        branch: String,
        /// Branch to compare against (defaults to the current branch)
        base: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Summarize uncommitted changes, or changes from a commit to HEAD
    Summary {
        /// Show changes from this commit to HEAD
        #[arg(long = "from", value_name = "COMMIT")]
        from: Option<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Print the raw diff and stats instead of a summary
    #[arg(long, conflicts_with = "preview")]
    raw: bool,

    /// Print token count, cost and stats without contacting OpenAI
    #[arg(long)]
    preview: bool,

    /// Disable colored Markdown output
    #[arg(long)]
    no_color: bool,

    /// Output in JSON format
    #[arg(long)]
    json: bool,
}

impl OutputArgs {
    fn mode(&self) -> OutputMode {
        if self.raw {
            OutputMode::Raw
        } else if self.preview {
            OutputMode::Preview
        } else {
            OutputMode::Explain
        }
    }
}

/// Main entry point
///
/// # Process flow
///
/// 1. Load `.env`, set up logging, parse arguments
/// 2. Load configuration (file, environment, flags)
/// 3. Verify we are inside a git repository
/// 4. Collect the diff, then render raw / preview output or request a summary
///
/// Any error is printed to stderr and the process exits non-zero.
#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    init_logging();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model = model;
    }

    let cwd = std::env::current_dir()?;
    let git = GitCli::new(cwd);
    git.ensure_repository()?;

    let (mode, output) = match cli.command {
        Commands::Compare {
            branch,
            base,
            output,
        } => {
            let base = match base {
                Some(base) => base,
                None => git.current_branch()?,
            };
            (DiffMode::Compare { branch, base }, output)
        }
        Commands::Summary { from, output } => (DiffMode::Summary { from }, output),
    };

    let request = DiffRequest {
        mode,
        output: output.mode(),
        color: !output.no_color && !output.json,
        json: output.json,
    };

    let openai = OpenAiClient::new(&config);
    let text = if request.json || !io::stderr().is_terminal() {
        app::execute(&request, &config, &git, &openai).await?
    } else {
        let spinning = WithSpinner { inner: &openai };
        app::execute(&request, &config, &git, &spinning).await?
    };

    println!("{}", text);
    Ok(())
}

/// Shows a rotating spinner on stderr while the wrapped summarizer works
struct WithSpinner<'a, S> {
    inner: &'a S,
}

impl<S: Summarizer> Summarizer for WithSpinner<'_, S> {
    async fn summarize(
        &self,
        diff: &str,
        model_id: &str,
        api_key: &str,
    ) -> commitlens::Result<SummaryResult> {
        let spinner_running = Arc::new(AtomicBool::new(true));
        let spinner_running_clone = Arc::clone(&spinner_running);

        let spinner_task = tokio::spawn(async move {
            let spinner_chars = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
            let mut idx = 0;
            let mut stderr = io::stderr();

            while spinner_running_clone.load(Ordering::Relaxed) {
                let _ = write!(stderr, "\r{} Summarizing changes...", spinner_chars[idx]);
                let _ = stderr.flush();
                idx = (idx + 1) % spinner_chars.len();
                sleep(Duration::from_millis(80)).await;
            }

            // Clear spinner line
            let _ = write!(stderr, "\r\x1b[K");
            let _ = stderr.flush();
        });

        let result = self.inner.summarize(diff, model_id, api_key).await;

        spinner_running.store(false, Ordering::Relaxed);
        let _ = spinner_task.await;

        result
    }
}
