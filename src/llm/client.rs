// Copyright 2026 Muvon Un Limited
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

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::ModelConfig;
use crate::error::ModelError;
use crate::llm::types::{ChatMessage, FinishReason, ModelResponse};
use crate::tools::ToolSpec;

/// A chat completion service that may answer or request tool invocations
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelResponse, ModelError>;
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    finish_reason: Option<String>,
    message: ChatMessage,
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
pub struct OpenAiClient {
    model: String,
    base_url: String,
    api_key_env: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &ModelConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Docent/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key_env: config.api_key_env.clone(),
            client,
        })
    }

    /// Build the request body in the standard OpenAI format
    fn request_body(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });

        if !tools.is_empty() {
            let tool_defs: Vec<Value> = tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.parameters,
                        }
                    })
                })
                .collect();
            body["tools"] = Value::Array(tool_defs);
        }

        body
    }

    fn parse_response(body: &str) -> Result<ModelResponse, ModelError> {
        let parsed: CompletionResponse =
            serde_json::from_str(body).map_err(|e| ModelError::Decode(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(ModelError::EmptyResponse)?;

        let finish_reason = choice
            .finish_reason
            .as_deref()
            .map(FinishReason::from)
            .unwrap_or(FinishReason::Stop);

        Ok(ModelResponse {
            finish_reason,
            message: choice.message,
        })
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelResponse, ModelError> {
        // Key is read per call, never cached
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ModelError::ApiKeyMissing(self.api_key_env.clone()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(messages, tools);

        debug!(
            model = %self.model,
            messages = messages.len(),
            tools = tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ModelError::Transport {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Self::parse_response(&text)
    }
}
