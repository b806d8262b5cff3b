//! OpenAI integration for diff summaries
//!
//! One chat-completion request per invocation. Failures are surfaced
//! immediately; nothing is retried.

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{CommitLensError, Result};
use crate::model::SummaryResult;
use crate::prompt::{build_user_prompt, truncate_diff};

/// Anything that can turn a diff into a natural-language explanation
#[allow(async_fn_in_trait)]
pub trait Summarizer {
    async fn summarize(&self, diff: &str, model_id: &str, api_key: &str) -> Result<SummaryResult>;
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiClient {
    http: Client,
    api_base: String,
    system_prompt: String,
    temperature: f32,
    max_prompt_chars: usize,
    timeout: Option<Duration>,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.clone(),
            system_prompt: config.system_prompt.clone(),
            temperature: config.temperature,
            max_prompt_chars: config.max_prompt_chars,
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    async fn send(&self, request: &ChatRequest<'_>, api_key: &str) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {api_key}"))
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|err| CommitLensError::ApiRequest {
                status: None,
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| CommitLensError::ApiRequest {
                status: Some(status.as_u16()),
                message: format!("failed to read response: {err}"),
            })?;

        if !status.is_success() {
            return Err(CommitLensError::ApiRequest {
                status: Some(status.as_u16()),
                message: upstream_message(&body),
            });
        }

        parse_completion(&body)
    }
}

impl Summarizer for OpenAiClient {
    async fn summarize(&self, diff: &str, model_id: &str, api_key: &str) -> Result<SummaryResult> {
        if api_key.trim().is_empty() {
            return Err(CommitLensError::MissingApiKey);
        }

        let prompt_diff = truncate_diff(diff, self.max_prompt_chars);
        if prompt_diff.truncated {
            info!(
                limit = self.max_prompt_chars,
                "diff truncated before sending"
            );
        }
        let user_prompt = build_user_prompt(&prompt_diff.text);
        let request = ChatRequest {
            model: model_id,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: self.temperature,
        };

        debug!(endpoint = %self.endpoint(), model = model_id, "requesting summary");
        let explanation = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(&request, api_key))
                .await
                .map_err(|_| CommitLensError::Timeout(limit.as_secs()))??,
            None => self.send(&request, api_key).await?,
        };

        Ok(SummaryResult {
            explanation,
            truncated: prompt_diff.truncated,
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|err| CommitLensError::ApiRequest {
            status: None,
            message: format!("unexpected response: {err}"),
        })?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| CommitLensError::ApiRequest {
            status: None,
            message: "response contained no completion".to_string(),
        })
}

/// Pull `error.message` out of an OpenAI error body, or fall back to the raw body
fn upstream_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "<empty response>".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
