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

use std::sync::Arc;
use tracing::{debug, info};

use crate::agent::prompt::{build_context, system_prompt, Persona};
use crate::config::Config;
use crate::error::{AgentError, AgentResult};
use crate::knowledge::{retriever, ChunkSet};
use crate::llm::{ChatMessage, ModelClient};
use crate::tools::{ToolRegistry, ToolSpec};

/// Per-engine settings, independent of how the engine is reached
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub persona: Persona,
    pub top_n: usize,
    pub max_tool_rounds: usize,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            persona: Persona {
                name: config.agent.name.clone(),
                subject: config.agent.subject.clone(),
            },
            top_n: config.retrieval.top_n,
            max_tool_rounds: config.agent.max_tool_rounds,
        }
    }
}

/// Answers user messages against the shared chunk set
///
/// Holds only read-only state; each turn owns its message list.
pub struct ConversationEngine {
    chunks: Arc<ChunkSet>,
    tools: Arc<ToolRegistry>,
    tool_specs: Vec<ToolSpec>,
    client: Arc<dyn ModelClient>,
    settings: EngineSettings,
}

impl ConversationEngine {
    pub fn new(
        chunks: Arc<ChunkSet>,
        tools: Arc<ToolRegistry>,
        client: Arc<dyn ModelClient>,
        settings: EngineSettings,
    ) -> Self {
        let tool_specs = tools.specs();
        Self {
            chunks,
            tools,
            tool_specs,
            client,
            settings,
        }
    }

    pub fn chunks(&self) -> &ChunkSet {
        &self.chunks
    }

    /// Build the opening message list for a turn: system prompt, history, new message
    pub fn build_messages(&self, message: &str, history: &[ChatMessage]) -> Vec<ChatMessage> {
        let relevant = retriever::find_relevant(&self.chunks, message, self.settings.top_n);
        debug!(chunks = relevant.len(), "Retrieved context");

        let context = build_context(&relevant);

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt(
            &self.settings.persona,
            &context,
        )));
        messages.extend_from_slice(history);
        messages.push(ChatMessage::user(message));
        messages
    }

    /// Produce the final answer for `message`, running tool rounds as requested
    ///
    /// If the model still asks for tools after `max_tool_rounds` rounds, those
    /// calls are not executed and the turn fails with `ToolLoopExceeded`.
    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> AgentResult<String> {
        let mut messages = self.build_messages(message, history);
        let max_rounds = self.settings.max_tool_rounds;

        for round in 0..=max_rounds {
            let response = self.client.complete(&messages, &self.tool_specs).await?;

            if !response.requests_tools() {
                info!(
                    tool_rounds = round,
                    finish_reason = response.finish_reason.as_str(),
                    "Turn complete"
                );
                return Ok(response.message.content.unwrap_or_default());
            }

            if round == max_rounds {
                break;
            }

            let calls = response.message.tool_calls.clone();
            info!(
                round = round + 1,
                max_rounds,
                calls = calls.len(),
                "Tool round"
            );

            // Every invocation gets exactly one result message before the next request
            messages.push(response.message);
            for call in &calls {
                let result = self
                    .tools
                    .invoke(&call.function.name, &call.function.arguments)
                    .await;
                messages.push(ChatMessage::tool(result.to_string(), &call.id));
            }
        }

        Err(AgentError::ToolLoopExceeded { rounds: max_rounds })
    }
}
