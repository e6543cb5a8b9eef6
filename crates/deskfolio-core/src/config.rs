use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::persona::Persona;
use crate::provider::Provider;

pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:4321/api/chat";
pub const DEFAULT_GATEWAY_BIND: &str = "127.0.0.1:4321";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub provider: Option<String>,
    pub default_model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub claude_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub gateway_url: Option<String>,
    pub gateway_bind: Option<String>,
    pub notes_path: Option<PathBuf>,
    pub dark_theme: bool,
    pub persona: Option<Persona>,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            provider: Some("gemini".to_string()),
            default_model: None,
            gemini_api_key: None,
            claude_api_key: None,
            openai_api_key: None,
            ollama_url: None,
            gateway_url: None,
            gateway_bind: None,
            notes_path: None,
            dark_theme: true,
            persona: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    // API keys: environment first, then config file

    pub fn gemini_key(&self) -> Option<String> {
        std::env::var("GOOGLE_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()
            .or_else(|| self.gemini_api_key.clone())
    }

    pub fn claude_key(&self) -> Option<String> {
        std::env::var("ANTHROPIC_API_KEY").ok()
            .or_else(|| self.claude_api_key.clone())
    }

    pub fn openai_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY").ok()
            .or_else(|| self.openai_api_key.clone())
    }

    /// The configured model, but only for the provider it was configured with
    pub fn model_for(&self, provider: Provider) -> Option<&str> {
        let configured = self.provider.as_deref().and_then(Provider::from_str)?;
        if configured == provider {
            self.default_model.as_deref()
        } else {
            None
        }
    }

    pub fn ollama_url(&self) -> &str {
        self.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    pub fn gateway_url(&self) -> String {
        std::env::var("DESKFOLIO_GATEWAY_URL").ok()
            .or_else(|| self.gateway_url.clone())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string())
    }

    pub fn gateway_bind(&self) -> &str {
        self.gateway_bind.as_deref().unwrap_or(DEFAULT_GATEWAY_BIND)
    }

    pub fn persona(&self) -> Persona {
        self.persona.clone().unwrap_or_default()
    }

    /// Where the notes slot lives: the configured path, or `notes.json` in the data dir
    pub fn notes_path(&self) -> Result<PathBuf> {
        match &self.notes_path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::get_data_dir()?.join("notes.json")),
        }
    }

    pub fn get_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow!("Could not determine data directory"))?;

        Ok(data_dir.join("deskfolio"))
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("deskfolio").join("config.json"))
    }
}
