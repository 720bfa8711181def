//! # Chat Client
//!
//! Thin wrapper around the OpenAI-compatible chat-completions endpoint.
//! Generators own their prompts and their parsing; this module only moves
//! a system/user prompt pair over the wire and hands back the reply text.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::config::LlmConfig;

/// One chat completion request
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub system: &'a str,
    /// Either a plain string or a multimodal content-part array
    pub user: serde_json::Value,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Shared LLM client. Cheap to clone; every generator gets one.
#[derive(Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(Self { http, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Default text model id
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Vision model id for image analysis
    pub fn vision_model(&self) -> &str {
        &self.config.vision_model
    }

    /// Run one completion and return the first choice's message content.
    pub async fn complete(&self, request: ChatRequest<'_>) -> Result<String> {
        if !self.is_configured() {
            return Err(anyhow!("GROQ_API_KEY not set"));
        }

        let body = json!({
            "model": request.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": request.user},
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let response = self
            .http
            .post(&self.config.chat_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("LLM request failed")?
            .error_for_status()
            .context("LLM returned an error status")?;

        let data: serde_json::Value = response
            .json()
            .await
            .context("LLM reply was not JSON")?;

        let content = data
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow!("LLM reply missing choices[0].message.content"))?;

        Ok(content.trim().to_string())
    }
}
