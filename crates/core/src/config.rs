//! # Configuration
//!
//! Environment-backed settings for the LLM provider and the pipeline.
//! Loaded once at service start; no ambient global state.

use std::time::Duration;

const DEFAULT_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";

/// LLM provider settings (OpenAI-compatible chat-completions endpoint)
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer token; empty means "not configured"
    pub api_key: String,
    /// Text model id
    pub model: String,
    /// Vision model id (image condition analysis)
    pub vision_model: String,
    /// Chat-completions endpoint URL
    pub chat_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            chat_url: DEFAULT_CHAT_URL.to_string(),
        }
    }
}

impl LlmConfig {
    /// Load from environment: `GROQ_API_KEY`, optional `GROQ_MODEL`,
    /// `GROQ_VISION_MODEL` and `GROQ_CHAT_URL` overrides.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GROQ_API_KEY").unwrap_or_default(),
            model: std::env::var("GROQ_MODEL")
                .map(|m| strip_provider_prefix(&m).to_string())
                .unwrap_or(defaults.model),
            vision_model: std::env::var("GROQ_VISION_MODEL").unwrap_or(defaults.vision_model),
            chat_url: std::env::var("GROQ_CHAT_URL").unwrap_or(defaults.chat_url),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Model ids are sometimes written router-style ("groq/llama-..."); the
/// chat API wants the bare model name.
pub fn strip_provider_prefix(model: &str) -> &str {
    model.split_once('/').map_or(model, |(prefix, rest)| {
        if prefix == "groq" {
            rest
        } else {
            model
        }
    })
}

/// Pipeline-level knobs
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Per-scraper wall-clock cap
    pub per_source_timeout: Duration,
    /// Max hits requested per search call
    pub max_results_per_source: usize,
    /// Cap for the auxiliary disassembly-manual lookup
    pub disassembly_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            per_source_timeout: Duration::from_secs(60),
            max_results_per_source: 5,
            disassembly_timeout: Duration::from_secs(15),
        }
    }
}

impl PipelineConfig {
    /// Load from environment (`MAX_RESULTS_PER_SOURCE`), defaults elsewhere.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_results = std::env::var("MAX_RESULTS_PER_SOURCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_results_per_source);
        Self {
            max_results_per_source: max_results,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_provider_prefix() {
        assert_eq!(
            strip_provider_prefix("groq/llama-3.3-70b-versatile"),
            "llama-3.3-70b-versatile"
        );
        assert_eq!(
            strip_provider_prefix("llama-3.3-70b-versatile"),
            "llama-3.3-70b-versatile"
        );
        // Only the groq/ router prefix is stripped
        assert_eq!(
            strip_provider_prefix("meta-llama/llama-4-scout-17b-16e-instruct"),
            "meta-llama/llama-4-scout-17b-16e-instruct"
        );
    }

    #[test]
    fn test_default_config() {
        let config = LlmConfig::default();
        assert!(!config.is_configured());
        assert!(config.chat_url.starts_with("https://"));
        assert!(config.model.contains("llama"));
    }

    #[test]
    fn test_pipeline_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.per_source_timeout, Duration::from_secs(60));
        assert_eq!(config.max_results_per_source, 5);
    }
}
