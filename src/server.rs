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

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::agent::ConversationEngine;
use crate::error::AgentError;
use crate::llm::ChatMessage;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

pub fn router(engine: Arc<ConversationEngine>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

pub async fn serve(engine: Arc<ConversationEngine>, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;

    info!(address = %bind, "HTTP server listening");
    eprintln!("Listening on http://{}", bind);

    axum::serve(listener, router(engine))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await?;

    Ok(())
}

pub async fn chat(
    State(engine): State<Arc<ConversationEngine>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatReply>, (StatusCode, Json<Value>)> {
    match engine.respond(&request.message, &request.history).await {
        Ok(reply) => Ok(Json(ChatReply { reply })),
        Err(e) => {
            warn!(error = %e, "Turn failed");
            let status = match e {
                AgentError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                AgentError::ToolLoopExceeded { .. } => StatusCode::BAD_GATEWAY,
            };
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}

pub async fn health(State(engine): State<Arc<ConversationEngine>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "chunks": engine.chunks().len(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::prompt::Persona;
    use crate::agent::EngineSettings;
    use crate::error::ModelError;
    use crate::knowledge::KnowledgeBase;
    use crate::llm::types::ModelResponse;
    use crate::llm::ModelClient;
    use crate::tools::{LogNotifier, ToolSpec};
    use async_trait::async_trait;
    use std::path::Path;

    struct FixedClient(Option<&'static str>);

    #[async_trait]
    impl ModelClient for FixedClient {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _tools: &[ToolSpec],
        ) -> Result<ModelResponse, ModelError> {
            match self.0 {
                Some(text) => Ok(ModelResponse::text(text)),
                None => Err(ModelError::Status {
                    status: 401,
                    body: "invalid api key".to_string(),
                }),
            }
        }
    }

    fn engine(reply: Option<&'static str>) -> Arc<ConversationEngine> {
        let kb = KnowledgeBase::from_pages(Path::new("doc.txt"), &["Some text."], 100).unwrap();
        let tools = Arc::new(crate::tools::contact_registry(Arc::new(LogNotifier)));
        let settings = EngineSettings {
            persona: Persona {
                name: "Docent".to_string(),
                subject: "document".to_string(),
            },
            top_n: 5,
            max_tool_rounds: 3,
        };
        Arc::new(ConversationEngine::new(
            kb.chunks(),
            tools,
            Arc::new(FixedClient(reply)),
            settings,
        ))
    }

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let request = ChatRequest {
            message: "hello".to_string(),
            history: vec![],
        };
        let Json(reply) = chat(State(engine(Some("hi there"))), Json(request))
            .await
            .unwrap();
        assert_eq!(reply.reply, "hi there");
    }

    #[tokio::test]
    async fn test_chat_maps_model_failure_to_503() {
        let request = ChatRequest {
            message: "hello".to_string(),
            history: vec![],
        };
        let (status, Json(body)) = chat(State(engine(None)), Json(request))
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("401"));
    }

    #[tokio::test]
    async fn test_health_reports_chunks() {
        let Json(body) = health(State(engine(Some("x")))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["chunks"], 1);
    }

    #[test]
    fn test_chat_request_history_is_optional() {
        let request: ChatRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert!(request.history.is_empty());
    }
}
