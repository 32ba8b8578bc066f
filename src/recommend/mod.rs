//! Activity recommendations
//!
//! Free-text traveller preferences are sent to an LLM chat-completion
//! provider (DeepSeek first, OpenAI otherwise). If no provider is configured
//! or the call fails in any way, the keyword matcher in [`fallback`] answers
//! instead, so a recommendation request never fails once its input is valid.

pub mod fallback;
pub mod llm;
pub mod prompt;

use crate::catalog::ActivityOption;
use crate::config::Config;
use crate::TripError;
use llm::ChatClient;
use prompt::ActivityPrompt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use fallback::keyword_recommendations;

/// Provider failures; these never escape `get_recommendations`
#[derive(Error, Debug)]
pub enum RecommendError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("{provider} API error: {status}")]
    Status {
        provider: Provider,
        status: reqwest::StatusCode,
    },

    #[error("Invalid JSON response from AI service: {0}")]
    InvalidResponse(String),

    #[error("Invalid prompt: {0}")]
    PromptError(#[from] serde_json::Error),

    #[error("No API keys configured")]
    NoApiKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    DeepSeek,
    #[serde(rename = "chatgpt")]
    ChatGpt,
}

impl Provider {
    pub fn model(self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek-chat",
            Provider::ChatGpt => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::DeepSeek => f.write_str("DeepSeek"),
            Provider::ChatGpt => f.write_str("ChatGPT"),
        }
    }
}

impl FromStr for Provider {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(Provider::DeepSeek),
            "chatgpt" | "openai" => Ok(Provider::ChatGpt),
            _ => Err(TripError::ParseError(format!("Invalid provider: {}", s))),
        }
    }
}

/// Where a set of recommendations came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    DeepSeek,
    #[serde(rename = "chatgpt")]
    ChatGpt,
    Keywords,
}

impl From<Provider> for RecommendationSource {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::DeepSeek => RecommendationSource::DeepSeek,
            Provider::ChatGpt => RecommendationSource::ChatGpt,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub activity_name: String,
    pub city: String,
    pub match_score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub recommendations: Vec<Recommendation>,
    pub summary: String,
    pub source: RecommendationSource,
}

/// Reachability of each configured provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub deepseek: bool,
    pub chatgpt: bool,
}

#[derive(Debug, Clone)]
struct ProviderSettings {
    endpoint: String,
    api_key: String,
}

pub struct RecommendationService {
    client: ChatClient,
    deepseek: Option<ProviderSettings>,
    openai: Option<ProviderSettings>,
}

impl RecommendationService {
    pub fn new(config: &Config) -> Result<Self, TripError> {
        let settings = |key: &Option<String>, endpoint: &str| {
            key.as_ref().map(|api_key| ProviderSettings {
                endpoint: endpoint.to_string(),
                api_key: api_key.clone(),
            })
        };

        let service = Self {
            client: ChatClient::new(config.http_timeout)?,
            deepseek: settings(&config.deepseek_api_key, &config.deepseek_endpoint),
            openai: settings(&config.openai_api_key, &config.openai_endpoint),
        };

        info!(
            deepseek = service.deepseek.is_some(),
            chatgpt = service.openai.is_some(),
            "Recommendation service initialized (DeepSeek primary, ChatGPT fallback)"
        );
        Ok(service)
    }

    fn settings(&self, provider: Provider) -> Option<&ProviderSettings> {
        match provider {
            Provider::DeepSeek => self.deepseek.as_ref(),
            Provider::ChatGpt => self.openai.as_ref(),
        }
    }

    /// Provider that would be asked: the preferred one if it has a key,
    /// else DeepSeek, else ChatGPT.
    pub fn select_provider(&self, preferred: Provider) -> Option<Provider> {
        [preferred, Provider::DeepSeek, Provider::ChatGpt]
            .into_iter()
            .find(|provider| self.settings(*provider).is_some())
    }

    /// Recommend activities for free-text preferences.
    ///
    /// Only invalid input is an error; provider failures fall back to
    /// keyword matching.
    #[instrument(level = "info", skip(self, activities), fields(activities = activities.len()))]
    pub async fn get_recommendations(
        &self,
        preferences: &str,
        activities: &[ActivityOption],
        preferred: Provider,
    ) -> Result<RecommendationResult, TripError> {
        if preferences.trim().is_empty() || activities.is_empty() {
            return Err(TripError::InvalidInput(
                "preferences and activities are required".to_string(),
            ));
        }

        match self.ask_provider(preferences, activities, preferred).await {
            Ok(result) => {
                info!(
                    source = ?result.source,
                    recommendations = result.recommendations.len(),
                    "AI recommendations received"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "AI recommendation failed, falling back to keywords");
                Ok(keyword_recommendations(preferences, activities))
            }
        }
    }

    async fn ask_provider(
        &self,
        preferences: &str,
        activities: &[ActivityOption],
        preferred: Provider,
    ) -> Result<RecommendationResult, RecommendError> {
        let provider = self.select_provider(preferred).ok_or(RecommendError::NoApiKeys)?;
        if provider != preferred {
            info!(preferred = %preferred, using = %provider, "Preferred provider not configured");
        }

        let prompt = ActivityPrompt::for_activities(preferences, activities)?;
        let (recommendations, summary) = self.call(provider, &prompt).await?;

        Ok(RecommendationResult {
            recommendations,
            summary,
            source: provider.into(),
        })
    }

    async fn call(
        &self,
        provider: Provider,
        prompt: &ActivityPrompt,
    ) -> Result<(Vec<Recommendation>, String), RecommendError> {
        let settings = self.settings(provider).ok_or(RecommendError::NoApiKeys)?;
        let content = self
            .client
            .complete(provider, &settings.endpoint, &settings.api_key, prompt)
            .await?;
        llm::parse_reply(&content)
    }

    /// Send a tiny prompt to every configured provider. A provider counts as
    /// reachable when it answers successfully with message content.
    pub async fn test_providers(&self) -> ProviderStatus {
        let prompt = ActivityPrompt::connectivity_check();
        let mut status = ProviderStatus::default();

        for provider in [Provider::DeepSeek, Provider::ChatGpt] {
            let Some(settings) = self.settings(provider) else {
                continue;
            };

            let reachable = match self
                .client
                .complete(provider, &settings.endpoint, &settings.api_key, &prompt)
                .await
            {
                Ok(_) => {
                    info!(provider = %provider, "Provider connected");
                    true
                }
                Err(e) => {
                    warn!(provider = %provider, error = %e, "Provider check failed");
                    false
                }
            };

            match provider {
                Provider::DeepSeek => status.deepseek = reachable,
                Provider::ChatGpt => status.chatgpt = reachable,
            }
        }

        status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn config(deepseek: Option<&str>, openai: Option<&str>) -> Config {
        Config {
            deepseek_api_key: deepseek.map(str::to_string),
            openai_api_key: openai.map(str::to_string),
            ..Config::default()
        }
    }

    #[test]
    fn test_provider_parsing() {
        assert!(matches!("deepseek".parse::<Provider>(), Ok(Provider::DeepSeek)));
        assert!(matches!("ChatGPT".parse::<Provider>(), Ok(Provider::ChatGpt)));
        assert!(matches!("openai".parse::<Provider>(), Ok(Provider::ChatGpt)));
        assert!("claude".parse::<Provider>().is_err());
    }

    #[test]
    fn test_select_provider() {
        let both = RecommendationService::new(&config(Some("d"), Some("o"))).unwrap();
        assert_eq!(both.select_provider(Provider::DeepSeek), Some(Provider::DeepSeek));
        assert_eq!(both.select_provider(Provider::ChatGpt), Some(Provider::ChatGpt));

        let openai_only = RecommendationService::new(&config(None, Some("o"))).unwrap();
        assert_eq!(openai_only.select_provider(Provider::DeepSeek), Some(Provider::ChatGpt));

        let deepseek_only = RecommendationService::new(&config(Some("d"), None)).unwrap();
        assert_eq!(deepseek_only.select_provider(Provider::ChatGpt), Some(Provider::DeepSeek));

        let none = RecommendationService::new(&config(None, None)).unwrap();
        assert_eq!(none.select_provider(Provider::DeepSeek), None);
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let service = RecommendationService::new(&config(None, None)).unwrap();
        let activities = Catalog::builtin().all_activities();

        assert!(matches!(
            service.get_recommendations("  ", &activities, Provider::DeepSeek).await,
            Err(TripError::InvalidInput(_))
        ));
        assert!(matches!(
            service.get_recommendations("temples", &[], Provider::DeepSeek).await,
            Err(TripError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_no_keys_uses_keywords() {
        let service = RecommendationService::new(&config(None, None)).unwrap();
        let activities = Catalog::builtin().all_activities();

        let result = service
            .get_recommendations("peaceful lake", &activities, Provider::DeepSeek)
            .await
            .unwrap();
        assert_eq!(result.source, RecommendationSource::Keywords);
        assert_eq!(result.recommendations[0].activity_name, "Fewa Taal");
    }

    #[tokio::test]
    async fn test_no_keys_reports_nothing_reachable() {
        let service = RecommendationService::new(&config(None, None)).unwrap();
        assert_eq!(service.test_providers().await, ProviderStatus::default());
    }

    #[test]
    fn test_recommendation_serializes_camel_case() {
        let rec = Recommendation {
            activity_name: "Sarangkot".to_string(),
            city: "pokhara".to_string(),
            match_score: 80.0,
            reasoning: "Sunrise".to_string(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["activityName"], "Sarangkot");
        assert_eq!(json["matchScore"], 80.0);
    }
}
