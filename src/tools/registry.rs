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

//! Tool registry: declares tools with JSON schemas and dispatches calls by name.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

/// Machine-readable tool declaration advertised to the model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A side-effecting function the model may call
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> &ToolSpec;

    /// Run the tool with arguments already validated against `spec().parameters`
    async fn call(&self, arguments: &Map<String, Value>) -> Result<Value>;
}

/// Explicit set of tools available to one engine
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; a tool with the same name is replaced
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.spec().name.clone();
        if let Some(existing) = self.tools.iter_mut().find(|t| t.spec().name == name) {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec().clone()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.spec().name == name)
            .map(|t| t.as_ref())
    }

    /// Dispatch a call by name with JSON-encoded arguments
    ///
    /// Never fails: unknown tools yield `{}`, invalid arguments and tool
    /// failures yield `{"error": ...}` so the model can continue the turn.
    pub async fn invoke(&self, name: &str, raw_arguments: &str) -> Value {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "Model requested unknown tool");
            return json!({});
        };

        let arguments = match parse_arguments(raw_arguments)
            .and_then(|args| validate_args(tool.spec(), &args).map(|_| args))
        {
            Ok(args) => args,
            Err(reason) => {
                warn!(tool = name, %reason, "Rejected tool arguments");
                return json!({ "error": reason });
            }
        };

        info!(tool = name, "Tool called");
        match tool.call(&arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!(tool = name, error = %e, "Tool failed");
                json!({ "error": e.to_string() })
            }
        }
    }
}

/// Decode the model's argument string into a JSON object
fn parse_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(format!(
            "Arguments must be a JSON object, got {}",
            json_type(&other)
        )),
        Err(e) => Err(format!("Arguments are not valid JSON: {e}")),
    }
}

/// Validate arguments against the tool's object schema:
/// required fields, primitive property types and `additionalProperties: false`.
pub fn validate_args(spec: &ToolSpec, args: &Map<String, Value>) -> Result<(), String> {
    let params = &spec.parameters;
    let properties = params.get("properties").and_then(|p| p.as_object());

    if let Some(required) = params.get("required").and_then(|r| r.as_array()) {
        for key in required.iter().filter_map(|r| r.as_str()) {
            if !args.contains_key(key) {
                return Err(format!("Missing required argument: {key}"));
            }
        }
    }

    let closed = params.get("additionalProperties") == Some(&Value::Bool(false));

    for (key, value) in args {
        let Some(schema) = properties.and_then(|p| p.get(key)) else {
            if closed {
                return Err(format!("Unexpected argument: {key}"));
            }
            continue;
        };

        if let Some(expected) = schema.get("type").and_then(|t| t.as_str()) {
            if !matches_type(expected, value) {
                return Err(format!(
                    "Argument {key} must be {expected}, got {}",
                    json_type(value)
                ));
            }
        }
    }

    Ok(())
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
