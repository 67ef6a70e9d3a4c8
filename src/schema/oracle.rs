//! Oracle (scoring service) configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How an artifact travels through the oracle before a score comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScoringPipeline {
    /// The artifact is embedded directly into the evaluation rubric.
    /// Used for code-skeleton artifacts.
    #[default]
    SingleStage,
    /// The artifact is itself a prompt: it is first sent to the oracle to
    /// generate an output, and that output is then scored through the
    /// rubric. Both stages use the same transport.
    TwoStage,
}

/// Connection and generation settings for the external scoring service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of the generation API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Connect timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Full request timeout in seconds. A call exceeding it resolves to the
    /// worst-score outcome instead of stalling the generation.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Maximum-output-token hint passed in the request options.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Scoring pipeline for this run's artifact kind.
    #[serde(default)]
    pub pipeline: ScoringPipeline,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            connect_timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_timeout_secs(),
            max_tokens: default_max_tokens(),
            pipeline: ScoringPipeline::default(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_model() -> String {
    "llama3.1".to_string()
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_tokens() -> u32 {
    800
}

impl OracleConfig {
    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oracle_config_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.connect_timeout(), Duration::from_secs(60));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.pipeline, ScoringPipeline::SingleStage);
    }

    #[test]
    fn test_oracle_config_deserializes_with_defaults() {
        let config: OracleConfig =
            serde_json::from_str(r#"{"model": "qwen3", "pipeline": "TwoStage"}"#).unwrap();
        assert_eq!(config.model, "qwen3");
        assert_eq!(config.pipeline, ScoringPipeline::TwoStage);
        assert_eq!(config.request_timeout_secs, 60);
    }
}
