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

use crate::knowledge::Chunk;
use crate::tools::contact::{RECORD_UNKNOWN_QUESTION, RECORD_USER_DETAILS};

/// Who the agent speaks as and what it has read
#[derive(Debug, Clone)]
pub struct Persona {
    pub name: String,
    pub subject: String,
}

/// Join retrieved chunks into the context block, separated by blank lines
pub fn build_context(chunks: &[&Chunk]) -> String {
    chunks
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn system_prompt(persona: &Persona, context: &str) -> String {
    format!(
        "You are acting as {name}, an expert who has read the entire {subject}.
You're answering questions related to its content and context. Stay professional and accurate.

Use only the context below to answer:

## Context:
{context}

If you don't know the answer from the context, use the `{unknown}` tool to record the question.
If the user is interested in being contacted, ask for their email; once they have given it, use the `{details}` tool.
",
        name = persona.name,
        subject = persona.subject,
        context = context,
        unknown = RECORD_UNKNOWN_QUESTION,
        details = RECORD_USER_DETAILS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_joined_with_blank_lines() {
        let a = Chunk::new(0, "first".to_string(), 0);
        let b = Chunk::new(1, "second".to_string(), 5);
        assert_eq!(build_context(&[&a, &b]), "first\n\nsecond");
        assert_eq!(build_context(&[]), "");
    }

    #[test]
    fn test_system_prompt_mentions_persona_context_and_tools() {
        let persona = Persona {
            name: "Ada".to_string(),
            subject: "annual report".to_string(),
        };
        let prompt = system_prompt(&persona, "Revenue grew.");

        assert!(prompt.starts_with("You are acting as Ada"));
        assert!(prompt.contains("the entire annual report"));
        assert!(prompt.contains("## Context:\nRevenue grew.\n"));
        assert!(prompt.contains("`record_unknown_question`"));
        assert!(prompt.contains("`record_user_details`"));
        assert!(prompt.contains("email"));
    }
}
