//! External reflection strategy backed by the OpenAI chat-completions API.
//!
//! One attempt per request, no retries. Every failure mode is soft: it is
//! logged with enough context to diagnose in production and the strategy
//! reports "no result", so the caller falls through to the heuristic. The
//! journaling flow is never blocked by an unavailable provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ReflectionStrategy;
use crate::reflection::ReflectionResult;

/// Internal constants of this strategy, not user-configurable inputs.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";
const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.7;

const SYSTEM_PROMPT: &str = "You are an empathetic journaling companion. \
    Reply with a single JSON object: {\"reflection\": string, \"action\": string}. \
    The reflection briefly mirrors what the author wrote; the action is one \
    small, concrete next step. No text outside the JSON object.";

pub struct OpenAiStrategy {
    base_url: String,
    /// Pre-computed `"Bearer <key>"` header value.
    cached_auth_header: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: &'static str,
    messages: Vec<Message>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Shape the model is asked to produce inside the completion text.
#[derive(Debug, Deserialize)]
struct GeneratedReflection {
    #[serde(default)]
    reflection: String,
    #[serde(default)]
    action: Option<String>,
}

impl OpenAiStrategy {
    pub fn new(api_key: &str, timeout: Duration) -> Self {
        Self::with_base_url(OPENAI_API_BASE, api_key, timeout)
    }

    /// Point the strategy at a different host. Tests use this to talk to a
    /// mock server; production always goes through [`OPENAI_API_BASE`].
    pub fn with_base_url(base_url: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            cached_auth_header: format!("Bearer {api_key}"),
            client: Client::builder()
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn build_request(goal: &str, content: &str) -> ChatRequest {
        let goal_line = if goal.is_empty() { "(none provided)" } else { goal };
        let user_prompt = format!("Goal: {goal_line}\n\nJournal entry:\n{content}");

        ChatRequest {
            model: MODEL,
            messages: vec![
                Message {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
        }
    }

    /// Pull a usable result out of the provider response, or explain why
    /// there is none.
    fn parse_response(chat_response: &ChatResponse) -> Result<ReflectionResult, String> {
        let text = chat_response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| "response had no message content".to_string())?;

        let generated: GeneratedReflection = serde_json::from_str(text.trim())
            .map_err(|e| format!("completion text was not valid JSON: {e}"))?;

        if generated.reflection.trim().is_empty() {
            return Err("completion JSON had an empty reflection".to_string());
        }

        Ok(ReflectionResult {
            reflection: generated.reflection,
            action: generated
                .action
                .filter(|action| !action.trim().is_empty()),
        })
    }

    async fn call_api(&self, goal: &str, content: &str) -> Result<ReflectionResult, String> {
        let request = Self::build_request(goal, content);

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", &self.cached_auth_header)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!(
                "provider returned {status}: {}",
                body.chars().take(200).collect::<String>()
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("response JSON decode failed: {e}"))?;

        Self::parse_response(&chat_response)
    }
}

#[async_trait]
impl ReflectionStrategy for OpenAiStrategy {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn try_generate(&self, goal: &str, content: &str) -> Option<ReflectionResult> {
        match self.call_api(goal, content).await {
            Ok(result) => Some(result),
            Err(reason) => {
                tracing::warn!(strategy = self.name(), %reason, "external reflection unavailable, falling back");
                None
            }
        }
    }
}
