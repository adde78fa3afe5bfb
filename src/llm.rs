//! Summarization client adapter for an OpenAI-compatible completion API.
//!
//! One fixed-shape request per run: a "helpful assistant" system turn plus
//! the rendered prompt as the single user turn. The first choice's message
//! content is the summary. No retries — a failed call surfaces immediately,
//! and a fresh cache from the same run stays valid for a cached-mode rerun.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{DigestError, Result};
use crate::utils::truncate_for_log;

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Turns a prompt into a natural-language summary.
pub trait Summarize {
    async fn summarize(&self, prompt: &str) -> Result<String>;
}

/// Chat-completions implementation of [`Summarize`].
pub struct CompletionClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl CompletionClient {
    pub fn new(config: &Config, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_api_url.clone(),
            model: model.into(),
        }
    }
}

impl Summarize for CompletionClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn summarize(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let t0 = Instant::now();
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| llm_error(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %truncate_for_log(&body, 300), "Completion API error");
            return Err(llm_error(format!("HTTP {status}: {body}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| llm_error(format!("unparseable response: {e}")))?;
        let summary = extract_content(parsed)?;

        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            preview = %truncate_for_log(&summary, 120),
            "Completion received"
        );
        Ok(summary)
    }
}

/// Pull the first choice's content out of a completion response.
fn extract_content(response: ChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| llm_error("completion returned no choices".to_string()))?
        .message
        .content
        .unwrap_or_default();

    if content.is_empty() {
        return Err(llm_error("completion returned empty content".to_string()));
    }
    Ok(content)
}

fn llm_error(reason: String) -> DigestError {
    DigestError::Llm { reason }
}
