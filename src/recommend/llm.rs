//! Chat-completion client shared by the DeepSeek and OpenAI providers

use super::prompt::ActivityPrompt;
use super::{Provider, Recommendation, RecommendError};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub const DEFAULT_SUMMARY: &str = "AI-generated activity recommendations";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// HTTP client for OpenAI-compatible `/chat/completions` endpoints
pub struct ChatClient {
    http_client: Client,
}

impl ChatClient {
    pub fn new(timeout: Duration) -> Result<Self, RecommendError> {
        let http_client = Client::builder()
            .user_agent(concat!("yatra/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { http_client })
    }

    /// Send the prompt and return the assistant's message content
    #[instrument(level = "info", skip(self, api_key, prompt), fields(provider = %provider))]
    pub async fn complete(
        &self,
        provider: Provider,
        endpoint: &str,
        api_key: &str,
        prompt: &ActivityPrompt,
    ) -> Result<String, RecommendError> {
        let body = json!({
            "model": provider.model(),
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user },
            ],
            // Low temperature keeps the JSON shape stable
            "temperature": 0.3,
            "max_tokens": 1500,
            "response_format": { "type": "json_object" },
        });

        info!(endpoint = %endpoint, "Calling chat completion API");
        let start_time = std::time::Instant::now();
        let response = self
            .http_client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        info!(
            status = %status,
            duration_ms = start_time.elapsed().as_millis(),
            "Chat completion request completed"
        );

        if !status.is_success() {
            error!(status = %status, "Chat completion request failed");
            return Err(RecommendError::Status { provider, status });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RecommendError::InvalidResponse("reply has no message content".to_string()))?;

        debug!(content_length = content.len(), "Chat completion content received");
        Ok(content)
    }
}

/// Validate the model's JSON reply. Entries missing a name, city, numeric
/// score or reasoning are dropped.
pub fn parse_reply(content: &str) -> Result<(Vec<Recommendation>, String), RecommendError> {
    let parsed: Value = serde_json::from_str(content)
        .map_err(|e| RecommendError::InvalidResponse(format!("reply is not JSON: {}", e)))?;

    let entries = parsed
        .get("recommendations")
        .and_then(Value::as_array)
        .ok_or_else(|| RecommendError::InvalidResponse("missing recommendations array".to_string()))?;

    let recommendations: Vec<Recommendation> = entries.iter().filter_map(parse_entry).collect();
    if recommendations.len() < entries.len() {
        debug!(
            dropped = entries.len() - recommendations.len(),
            "Dropped incomplete recommendations"
        );
    }

    let summary = parsed
        .get("summary")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUMMARY)
        .to_string();

    Ok((recommendations, summary))
}

fn parse_entry(entry: &Value) -> Option<Recommendation> {
    let non_empty = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Some(Recommendation {
        activity_name: non_empty("activityName")?,
        city: non_empty("city")?,
        match_score: entry.get("matchScore").and_then(Value::as_f64)?,
        reasoning: non_empty("reasoning")?,
    })
}
