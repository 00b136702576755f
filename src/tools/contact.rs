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

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::tools::notify::Notifier;
use crate::tools::registry::{Tool, ToolRegistry, ToolSpec};

pub const RECORD_USER_DETAILS: &str = "record_user_details";
pub const RECORD_UNKNOWN_QUESTION: &str = "record_unknown_question";

fn recorded() -> Value {
    json!({ "recorded": "ok" })
}

fn string_arg<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    arguments.get(key).and_then(|v| v.as_str())
}

/// Records that a user wants to be contacted and left an email address
pub struct RecordUserDetails {
    spec: ToolSpec,
    notifier: Arc<dyn Notifier>,
}

impl RecordUserDetails {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            spec: ToolSpec {
                name: RECORD_USER_DETAILS.to_string(),
                description: "Use this tool to record that a user is interested in being in touch and provided an email address".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "email": {
                            "type": "string",
                            "description": "The email address of this user"
                        },
                        "name": {
                            "type": "string",
                            "description": "The user's name, if they provided it"
                        },
                        "notes": {
                            "type": "string",
                            "description": "Additional info about the conversation"
                        }
                    },
                    "required": ["email"],
                    "additionalProperties": false
                }),
            },
            notifier,
        }
    }
}

#[async_trait]
impl Tool for RecordUserDetails {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value> {
        let email = string_arg(arguments, "email")
            .ok_or_else(|| anyhow::anyhow!("Missing required parameter: email"))?;
        let name = string_arg(arguments, "name").unwrap_or("Name not provided");
        let notes = string_arg(arguments, "notes").unwrap_or("not provided");

        self.notifier
            .notify(&format!(
                "Recording {} with email {} and notes {}",
                name, email, notes
            ))
            .await;

        Ok(recorded())
    }
}

/// Records a question the document could not answer
pub struct RecordUnknownQuestion {
    spec: ToolSpec,
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestion {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            spec: ToolSpec {
                name: RECORD_UNKNOWN_QUESTION.to_string(),
                description:
                    "Always use this tool to record any question that couldn't be answered"
                        .to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "question": {
                            "type": "string",
                            "description": "The question that couldn't be answered"
                        }
                    },
                    "required": ["question"],
                    "additionalProperties": false
                }),
            },
            notifier,
        }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestion {
    fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value> {
        let question = string_arg(arguments, "question")
            .ok_or_else(|| anyhow::anyhow!("Missing required parameter: question"))?;

        self.notifier
            .notify(&format!("Recording {}", question))
            .await;

        Ok(recorded())
    }
}

/// Registry with the two contact tools, sharing one notifier
pub fn contact_registry(notifier: Arc<dyn Notifier>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(RecordUserDetails::new(Arc::clone(&notifier))));
    registry.register(Box::new(RecordUnknownQuestion::new(notifier)));
    registry
}
