//! Fitness oracle client: scores artifacts through an external LLM service.
//!
//! The oracle is the crate's only side-effecting boundary. Everything that
//! can go wrong here (transport, decoding, score extraction) surfaces as an
//! [`OracleError`]; the population evaluator converts those into the
//! worst-possible fitness rather than aborting a run.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::schema::{OracleConfig, ScoringPipeline};

/// Capability interface for fitness scoring, injected into the engine so
/// tests can substitute a deterministic stub.
pub trait Scorer: Send + Sync {
    /// Score one rendered artifact. Higher is better.
    fn score(&self, artifact: &str) -> Result<Evaluation, OracleError>;
}

/// A successful oracle evaluation.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Extracted scalar score.
    pub score: f32,
    /// The oracle's full explanatory text, kept for diagnostics.
    pub raw: String,
}

/// Oracle failure taxonomy. All variants are absorbed at the evaluator
/// boundary as a zero score.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// Network/connection failure or timeout reaching the service.
    #[error("oracle transport failure: {0}")]
    Transport(String),
    /// Response payload is not valid JSON or lacks the expected text field.
    #[error("oracle response could not be decoded: {0}")]
    Decode(String),
    /// Response text contains no recognizable score pattern.
    #[error("no score found in oracle response: {snippet:?}")]
    ScoreMissing { snippet: String },
}

/// Matches the first `TOTAL SCORE` or `Average` label followed by optional
/// separators and a decimal numeral, case-insensitively.
static SCORE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:total\s*score|average)\s*[:=\-]*\s*(\d+(?:\.\d+)?)")
        .expect("score pattern is a valid regex")
});

/// Extract the scalar fitness from the oracle's explanatory text.
pub fn extract_score(text: &str) -> Result<f32, OracleError> {
    let captures = SCORE_PATTERN.captures(text).ok_or_else(|| snippet_error(text))?;
    captures[1].parse::<f32>().map_err(|_| snippet_error(text))
}

fn snippet_error(text: &str) -> OracleError {
    let snippet: String = text.chars().take(120).collect();
    OracleError::ScoreMissing { snippet }
}

/// Evaluation-instruction template. Asks for per-criterion sub-scores plus
/// the final aggregate line the extractor looks for.
const EVAL_INSTRUCTIONS: &str = "You are a strict code reviewer.

Rate the code below on each criterion from 1 to 10:
- Correctness
- Readability
- Efficiency
- Robustness

Explain briefly, then end your answer with exactly one line of the form:
TOTAL SCORE: <average of the four ratings>

Code to evaluate:
";

/// Build the evaluation prompt with the scored text embedded.
pub fn build_eval_prompt(text: &str) -> String {
    format!("{EVAL_INSTRUCTIONS}\n{text}\n")
}

/// Ollama generation API request body.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

/// Generation options; `num_predict` bounds the output length.
#[derive(Debug, Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

/// Ollama generation API response body. Only the text field matters.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Scorer backed by an Ollama-compatible HTTP generation endpoint.
pub struct OllamaScorer {
    client: reqwest::blocking::Client,
    config: OracleConfig,
}

impl OllamaScorer {
    /// Create a scorer with connect/request timeouts from the config.
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// One generation round-trip: POST the prompt, return the response text.
    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.config.base_url);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                num_predict: self.config.max_tokens,
            },
        };

        debug!(
            "oracle request: model={}, prompt_len={}",
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| OracleError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Transport(format!("HTTP {status}: {body}")));
        }

        let decoded: GenerateResponse = response
            .json()
            .map_err(|e| OracleError::Decode(e.to_string()))?;

        Ok(decoded.response)
    }
}

impl Scorer for OllamaScorer {
    /// Score an artifact according to the configured pipeline.
    ///
    /// `SingleStage` embeds the artifact into the rubric directly.
    /// `TwoStage` treats the artifact as a prompt: the oracle generates an
    /// output from it first, and that output is what gets scored.
    fn score(&self, artifact: &str) -> Result<Evaluation, OracleError> {
        let scored_text = match self.config.pipeline {
            ScoringPipeline::SingleStage => artifact.to_string(),
            ScoringPipeline::TwoStage => self.generate(artifact)?,
        };

        let raw = self.generate(&build_eval_prompt(&scored_text))?;
        let score = extract_score(&raw)?;

        Ok(Evaluation { score, raw })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_total_score() {
        let text = "Correctness: 8\nReadability: 7\n\nTOTAL SCORE: 7.5\n";
        assert_eq!(extract_score(text).unwrap(), 7.5);
    }

    #[test]
    fn test_extract_average_label() {
        assert_eq!(extract_score("Average: 6").unwrap(), 6.0);
        assert_eq!(extract_score("the average = 4.25 overall").unwrap(), 4.25);
    }

    #[test]
    fn test_extract_is_case_insensitive() {
        assert_eq!(extract_score("total score - 9.0").unwrap(), 9.0);
        assert_eq!(extract_score("Total Score:8").unwrap(), 8.0);
    }

    #[test]
    fn test_extract_takes_first_match() {
        let text = "TOTAL SCORE: 3.5\nOn reflection, TOTAL SCORE: 9";
        assert_eq!(extract_score(text).unwrap(), 3.5);
    }

    #[test]
    fn test_extract_missing_score_errors() {
        let err = extract_score("the model rambled and gave no verdict").unwrap_err();
        assert!(matches!(err, OracleError::ScoreMissing { .. }));
    }

    #[test]
    fn test_eval_prompt_embeds_artifact() {
        let prompt = build_eval_prompt("def f():\n    return 1");
        assert!(prompt.contains("def f():"));
        assert!(prompt.contains("TOTAL SCORE"));
    }

    #[test]
    fn test_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.1",
            prompt: "hello",
            stream: false,
            options: GenerateOptions { num_predict: 800 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.1");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 800);
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{
            "model": "llama3.1",
            "created_at": "2025-01-01T00:00:00Z",
            "response": "TOTAL SCORE: 7",
            "done": true
        }"#;

        let decoded: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.response, "TOTAL SCORE: 7");
    }

    #[test]
    fn test_response_missing_text_field_fails() {
        let json = r#"{"model": "llama3.1", "done": true}"#;
        assert!(serde_json::from_str::<GenerateResponse>(json).is_err());
    }

    #[test]
    fn test_scorer_construction() {
        let scorer = OllamaScorer::new(OracleConfig::default());
        assert!(scorer.is_ok());
    }

    #[test]
    fn test_unreachable_oracle_is_a_transport_error() {
        // Nothing listens on this port; connect fails fast.
        let config = OracleConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            connect_timeout_secs: 1,
            request_timeout_secs: 1,
            ..Default::default()
        };
        let scorer = OllamaScorer::new(config).unwrap();
        let err = scorer.score("def f(): pass").unwrap_err();
        assert!(matches!(err, OracleError::Transport(_)));
    }
}
