//! Runtime configuration loaded from environment variables
//!
//! A `.env` file in the working directory is read first when present.

use crate::receipt::ServiceFee;
use crate::recommend::Provider;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEEPSEEK_ENDPOINT: &str = "https://api.deepseek.com/v1/chat/completions";
pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct Config {
    /// DeepSeek key; the primary recommendation provider
    pub deepseek_api_key: Option<String>,
    /// OpenAI key; used when DeepSeek is not configured
    pub openai_api_key: Option<String>,
    pub deepseek_endpoint: String,
    pub openai_endpoint: String,
    pub preferred_provider: Provider,
    /// Artificial delay of the simulated travel endpoints
    pub simulated_latency: Duration,
    pub cache_ttl: Duration,
    pub service_fee: ServiceFee,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepseek_api_key: None,
            openai_api_key: None,
            deepseek_endpoint: DEEPSEEK_ENDPOINT.to_string(),
            openai_endpoint: OPENAI_ENDPOINT.to_string(),
            preferred_provider: Provider::DeepSeek,
            simulated_latency: Duration::from_millis(750),
            cache_ttl: Duration::from_secs(30 * 60),
            service_fee: ServiceFee::STANDARD,
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from the environment. Unset or unparsable values
    /// keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let preferred_provider = match env::var("YATRA_PREFERRED_PROVIDER") {
            Ok(value) => value
                .parse::<Provider>()
                .map_err(|_| ConfigError::Invalid("YATRA_PREFERRED_PROVIDER", value))?,
            Err(_) => defaults.preferred_provider,
        };

        Ok(Self {
            deepseek_api_key: secret("DEEPSEEK_API_KEY"),
            openai_api_key: secret("OPENAI_API_KEY"),
            deepseek_endpoint: env::var("YATRA_DEEPSEEK_ENDPOINT").unwrap_or(defaults.deepseek_endpoint),
            openai_endpoint: env::var("YATRA_OPENAI_ENDPOINT").unwrap_or(defaults.openai_endpoint),
            preferred_provider,
            simulated_latency: parsed::<u64>("YATRA_SIMULATED_LATENCY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_latency),
            cache_ttl: parsed::<u64>("YATRA_CACHE_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            service_fee: parsed::<u32>("YATRA_SERVICE_FEE_BPS")
                .map(ServiceFee::from_basis_points)
                .unwrap_or(defaults.service_fee),
            http_timeout: parsed::<u64>("YATRA_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        })
    }

    pub fn has_llm_keys(&self) -> bool {
        self.deepseek_api_key.is_some() || self.openai_api_key.is_some()
    }
}

/// Non-empty, trimmed variable
fn secret(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.preferred_provider, Provider::DeepSeek);
        assert_eq!(config.cache_ttl, Duration::from_secs(1800));
        assert_eq!(config.service_fee, ServiceFee::STANDARD);
        assert!(!config.has_llm_keys());
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("OPENAI_API_KEY", "  sk-test  ");
        env::set_var("YATRA_SIMULATED_LATENCY_MS", "0");
        env::set_var("YATRA_SERVICE_FEE_BPS", "not-a-number");
        env::set_var("YATRA_PREFERRED_PROVIDER", "chatgpt");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.simulated_latency, Duration::ZERO);
        assert_eq!(config.service_fee, ServiceFee::STANDARD);
        assert_eq!(config.preferred_provider, Provider::ChatGpt);
        assert!(config.has_llm_keys());

        env::set_var("YATRA_PREFERRED_PROVIDER", "gemini");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("YATRA_PREFERRED_PROVIDER", _))
        ));

        env::remove_var("OPENAI_API_KEY");
        env::remove_var("YATRA_SIMULATED_LATENCY_MS");
        env::remove_var("YATRA_SERVICE_FEE_BPS");
        env::remove_var("YATRA_PREFERRED_PROVIDER");
    }
}
