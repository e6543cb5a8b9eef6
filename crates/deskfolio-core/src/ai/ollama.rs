//! Local Ollama server, for running the gateway without a hosted API key.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TaggedModel>,
}

#[derive(Deserialize)]
struct TaggedModel {
    name: String,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn query(&self, model: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
        };

        let response = self
            .client
            .post(self.endpoint("/api/generate"))
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Ollama not reachable at {}", self.base_url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Ollama returned {} for model '{}'",
                response.status(),
                model
            ));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }

    /// Names of the models pulled on this server
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(self.endpoint("/api/tags"))
            .send()
            .await
            .with_context(|| format!("Ollama not reachable at {}", self.base_url))?;

        if !response.status().is_success() {
            return Err(anyhow!("Ollama model listing failed: {}", response.status()));
        }

        let tags: TagsResponse = response.json().await?;
        Ok(model_names(tags))
    }
}

fn model_names(tags: TagsResponse) -> Vec<String> {
    tags.models.into_iter().map(|model| model.name).collect()
}
