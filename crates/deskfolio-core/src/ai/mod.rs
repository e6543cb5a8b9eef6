//! Upstream text generators the chat gateway relays prompts to.

pub mod claude;
pub mod gemini;
pub mod ollama;
pub mod openai;

pub use claude::ClaudeClient;
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::config::Config;
use crate::provider::Provider;

/// Anything that turns a single prompt into a single text reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub enum UpstreamClient {
    Gemini(GeminiClient),
    Ollama(OllamaClient),
    Claude(ClaudeClient),
    OpenAI(OpenAIClient),
}

/// A provider client paired with the model it should query
#[derive(Clone)]
pub struct UpstreamModel {
    client: UpstreamClient,
    model: String,
}

impl UpstreamModel {
    pub fn new(client: UpstreamClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Build the upstream for `provider` from config, failing when a hosted
    /// provider has no API key.
    pub fn from_config(config: &Config, provider: Provider, model: Option<&str>) -> Result<Self> {
        let model = model
            .or_else(|| config.model_for(provider))
            .unwrap_or_else(|| provider.default_model())
            .to_string();

        let client = match provider {
            Provider::Gemini => {
                let key = config
                    .gemini_key()
                    .ok_or_else(|| anyhow!("Gemini API key not configured (set GOOGLE_API_KEY)"))?;
                UpstreamClient::Gemini(GeminiClient::new(&key))
            }
            Provider::Ollama => UpstreamClient::Ollama(OllamaClient::new(config.ollama_url())),
            Provider::Claude => {
                let key = config
                    .claude_key()
                    .ok_or_else(|| anyhow!("Claude API key not configured (set ANTHROPIC_API_KEY)"))?;
                UpstreamClient::Claude(ClaudeClient::new(&key))
            }
            Provider::OpenAI => {
                let key = config
                    .openai_key()
                    .ok_or_else(|| anyhow!("OpenAI API key not configured (set OPENAI_API_KEY)"))?;
                UpstreamClient::OpenAI(OpenAIClient::new(&key))
            }
        };

        Ok(Self::new(client, model))
    }

    pub fn provider(&self) -> Provider {
        match self.client {
            UpstreamClient::Gemini(_) => Provider::Gemini,
            UpstreamClient::Ollama(_) => Provider::Ollama,
            UpstreamClient::Claude(_) => Provider::Claude,
            UpstreamClient::OpenAI(_) => Provider::OpenAI,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Models the provider offers; Ollama is asked, hosted providers use a known list
    pub async fn available_models(&self) -> Result<Vec<String>> {
        match &self.client {
            UpstreamClient::Gemini(_) => Ok(GeminiClient::list_models()),
            UpstreamClient::Ollama(client) => client.list_models().await,
            UpstreamClient::Claude(_) => Ok(ClaudeClient::list_models()),
            UpstreamClient::OpenAI(_) => Ok(OpenAIClient::list_models()),
        }
    }
}

#[async_trait]
impl TextGenerator for UpstreamModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match &self.client {
            UpstreamClient::Gemini(client) => client.query(&self.model, prompt).await,
            UpstreamClient::Ollama(client) => client.query(&self.model, prompt).await,
            UpstreamClient::Claude(client) => client.query(&self.model, prompt).await,
            UpstreamClient::OpenAI(client) => client.query(&self.model, prompt).await,
        }
    }
}
