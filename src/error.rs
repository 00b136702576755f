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

use thiserror::Error;

/// Failures talking to the chat completion service
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("API key missing: set the {0} environment variable")]
    ApiKeyMissing(String),

    #[error("connection to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("model service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode model response: {0}")]
    Decode(String),

    #[error("model response contained no choices")]
    EmptyResponse,
}

/// Turn-level failures surfaced to the caller
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model service unavailable: {0}")]
    ServiceUnavailable(#[from] ModelError),

    #[error("tool loop exceeded after {rounds} rounds without a final answer")]
    ToolLoopExceeded { rounds: usize },
}

pub type AgentResult<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_error_converts_to_service_unavailable() {
        let err: AgentError = ModelError::EmptyResponse.into();
        assert!(matches!(err, AgentError::ServiceUnavailable(_)));
        assert_eq!(
            err.to_string(),
            "model service unavailable: model response contained no choices"
        );
    }

    #[test]
    fn test_tool_loop_message() {
        let err = AgentError::ToolLoopExceeded { rounds: 5 };
        assert!(err.to_string().contains("5 rounds"));
    }
}
