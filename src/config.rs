//! Configuration management for CommitLens
//!
//! Settings come from built-in defaults, an optional TOML file, and the
//! environment (`OPENAI_API_KEY`, `OPENAI_MODEL`, `OPENAI_BASE_URL`), in
//! increasing order of precedence. The resulting [`Config`] is passed
//! explicitly to every stage of the pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;

use crate::cost::ModelPrice;
use crate::prompt::{DEFAULT_SYSTEM_PROMPT, TRUNCATION_MARKER};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Runtime configuration
///
/// # Example TOML
///
/// ```toml
/// model = "gpt-4o"
/// temperature = 0.2
///
/// # Optional: diffs longer than this many characters are truncated (default: 400,000)
/// max_prompt_chars = 200000
///
/// # Optional: give up on the summary request after this many seconds
/// timeout_secs = 60
///
/// [prices."my-finetune"]
/// input_per_million = 0.30
/// output_per_million = 1.20
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Model identifier sent to the completion API
    pub model: String,
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,
    /// System prompt sent ahead of the diff
    pub system_prompt: String,
    pub temperature: f32,
    /// Maximum number of diff characters placed in the prompt
    pub max_prompt_chars: usize,
    /// Estimated token count above which a warning is logged
    pub token_warning_threshold: usize,
    /// Bound on the summary request; unbounded when absent
    pub timeout_secs: Option<u64>,
    /// Extra or overriding entries for the price table
    pub prices: HashMap<String, ModelPrice>,
    /// Never read from the file, only from the environment
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: 0.3,
            max_prompt_chars: 400_000,
            token_warning_threshold: 100_000,
            timeout_secs: None,
            prices: HashMap::new(),
            api_key: None,
        }
    }
}

impl Config {
    /// Build the configuration from an optional file plus the process environment
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay environment values using `lookup`; blank values are ignored
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_blank("OPENAI_API_KEY") {
            self.api_key = Some(key.trim().to_string());
        }
        if let Some(model) = non_blank("OPENAI_MODEL") {
            self.model = model.trim().to_string();
        }
        if let Some(base) = non_blank("OPENAI_BASE_URL") {
            self.api_base = base.trim().to_string();
        }
    }

    fn validate(&self, source: &str) -> Result<()> {
        if self.system_prompt.trim().is_empty() {
            anyhow::bail!(
                "Configuration error: 'system_prompt' cannot be empty or whitespace-only in {}",
                source
            );
        }
        if self.max_prompt_chars <= TRUNCATION_MARKER.chars().count() {
            anyhow::bail!(
                "Configuration error: 'max_prompt_chars' must be greater than {} in {}",
                TRUNCATION_MARKER.chars().count(),
                source
            );
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("Configuration error: 'model' cannot be empty in {}", source);
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// * File does not exist
/// * Invalid TOML format or unknown fields
/// * `system_prompt` is empty or whitespace-only
/// * `max_prompt_chars` too small to hold the truncation marker
///
/// # Example
///
/// ```no_run
/// use commitlens::config::load_config;
///
/// # fn main() -> anyhow::Result<()> {
/// let config = load_config("commitlens.toml")?;
/// println!("Model: {}", config.model);
/// # Ok(())
/// # }
/// ```
pub fn load_config(config_path: &str) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .context(format!("Failed to read config file: {}", config_path))?;
    let config: Config =
        toml::from_str(&content).context("Failed to parse config file as TOML")?;
    config.validate(config_path)?;
    Ok(config)
}
