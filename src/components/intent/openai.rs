use super::models::Command;
use super::parse::parse_command;
use super::IntentExtractor;
use crate::config::Config;
use crate::error::{language_model_error, AgentResult};
use async_trait::async_trait;
use chrono::Utc;
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const SYSTEM_PROMPT: &str = "You are a Google Calendar assistant. You read a user's message and reply ONLY with a single JSON object, with no markdown, no backticks and no extra text.";

const USER_PROMPT_TEMPLATE: &str = "Current date and time: {now}
User time zone: {timezone}

Analyze the user's message and decide whether they want to create an event or retrieve events.
Return a JSON object with exactly these keys:
{\"intent\": \"create\" | \"get\", \"title\": string | null, \"description\": string | null, \"start_date\": string | null, \"end_date\": string | null}

Rules:
- Dates are ISO 8601 date-times in the user's time zone, e.g. 2025-03-01T15:00:00.
- Resolve relative phrases such as \"tomorrow at 3 PM\" or \"next week\" against the current date.
- When creating, give the event a short title without the scheduling words.
- When retrieving, start_date and end_date describe the range to search.

User message: \"{message}\"";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Extracts commands with the OpenAI chat completions API
pub struct OpenAiExtractor {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: f32,
    timezone: Tz,
}

impl OpenAiExtractor {
    /// Create a live extractor; fails when no API key is configured
    pub fn new(config: &Config) -> AgentResult<Self> {
        let api_key = config
            .openai_api_key
            .clone()
            .ok_or_else(|| language_model_error("OPENAI_API_KEY is not set"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| language_model_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model: config.openai_model.clone(),
            endpoint: format!(
                "{}/chat/completions",
                config.openai_base_url.trim_end_matches('/')
            ),
            temperature: config.temperature,
            timezone: config.timezone,
        })
    }

    fn build_prompt(&self, utterance: &str) -> String {
        let now = Utc::now().with_timezone(&self.timezone);
        USER_PROMPT_TEMPLATE
            .replace("{now}", &now.to_rfc3339())
            .replace("{timezone}", self.timezone.name())
            .replace("{message}", utterance)
    }

    async fn complete(&self, prompt: String) -> AgentResult<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| language_model_error(&format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| language_model_error(&format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            debug!("Language model error body: {}", text);
            return Err(language_model_error(&format!(
                "Request failed with status {}",
                status
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            language_model_error(&format!("Failed to parse completion response: {}", e))
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| language_model_error("No response content from the model"))
    }
}

#[async_trait]
impl IntentExtractor for OpenAiExtractor {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn extract(&self, utterance: &str) -> AgentResult<Command> {
        info!("Interpreting message with {}", self.model);
        let reply = self.complete(self.build_prompt(utterance)).await?;
        debug!("Model reply: {}", reply);
        parse_command(&reply)
    }
}
