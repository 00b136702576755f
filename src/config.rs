// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_TEMPLATE: &str = include_str!("../config-templates/default.toml");

/// Source document configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub path: PathBuf,
    pub chunk_size: usize,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("documents/document.pdf"),
            chunk_size: 1000,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_n: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

/// Persona and turn limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub name: String,
    pub subject: String,
    pub max_tool_rounds: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: "Docent".to_string(),
            subject: "document".to_string(),
            max_tool_rounds: 5,
        }
    }
}

/// Chat completion service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Push notification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub token_env: String,
    pub user_env: String,
    pub timeout_secs: u64,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://api.pushover.net/1/messages.json".to_string(),
            token_env: "PUSHOVER_TOKEN".to_string(),
            user_env: "PUSHOVER_USER".to_string(),
            timeout_secs: 10,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:7860".to_string(),
        }
    }
}

/// Main configuration for docent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub document: DocumentConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub push: PushConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from config.toml file
    /// First tries to load from system config directory, falls back to embedded template
    pub fn load() -> Result<Self> {
        let config_path = crate::storage::get_system_config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Config doesn't exist, create from template
            let config = Self::from_toml(DEFAULT_TEMPLATE)?;

            if let Some(parent) = config_path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(&config_path, DEFAULT_TEMPLATE)?;

            Ok(config)
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.document.chunk_size == 0 {
            anyhow::bail!("document.chunk_size must be greater than zero");
        }
        if self.retrieval.top_n == 0 {
            anyhow::bail!("retrieval.top_n must be greater than zero");
        }
        if self.agent.max_tool_rounds == 0 {
            anyhow::bail!("agent.max_tool_rounds must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = Config::from_toml(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(config.document.chunk_size, 1000);
        assert_eq!(config.retrieval.top_n, 5);
        assert_eq!(config.agent.max_tool_rounds, 5);
        assert_eq!(config.model.model, "gpt-4o-mini");
        assert_eq!(config.push.token_env, "PUSHOVER_TOKEN");
        assert_eq!(config.push.user_env, "PUSHOVER_USER");
        assert!(config.push.enabled);
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let config = Config::from_toml("[retrieval]\ntop_n = 3\n").unwrap();
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.document.chunk_size, 1000);
        assert_eq!(config.server.bind, "127.0.0.1:7860");
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml("[model]\nmodel = \"gpt-4o\"\n").unwrap();
        assert_eq!(config.model.model, "gpt-4o");
        assert_eq!(config.model.base_url, "https://api.openai.com/v1");
        assert_eq!(config.model.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.model.timeout_secs, 60);

        let config = Config::from_toml("[document]\npath = \"report.pdf\"\n").unwrap();
        assert_eq!(config.document.path, PathBuf::from("report.pdf"));
        assert_eq!(config.document.chunk_size, 1000);

        let config = Config::from_toml("[push]\nenabled = false\n").unwrap();
        assert!(!config.push.enabled);
        assert_eq!(config.push.token_env, "PUSHOVER_TOKEN");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let result = Config::from_toml("[document]\npath = \"a.pdf\"\nchunk_size = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_tool_rounds_rejected() {
        let result = Config::from_toml(
            "[agent]\nname = \"A\"\nsubject = \"b\"\nmax_tool_rounds = 0\n",
        );
        assert!(result.is_err());
    }
}
