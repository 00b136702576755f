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

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "docent")]
#[command(version, author = "Muvon Un Limited <opensource@muvon.io>")]
#[command(about = "Ask questions about a document, answered by an LLM grounded in its text", long_about = None)]
pub struct Cli {
    /// Use this config file instead of the system one
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Document to load (overrides document.path from config)
    #[arg(short, long, global = true)]
    pub document: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat session about the document
    Chat,

    /// Ask a single question and print the answer
    Ask {
        /// The question to answer
        question: String,
    },

    /// Serve the chat over HTTP (POST /chat, GET /health)
    Serve {
        /// Address to bind (overrides server.bind from config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Show which chunks a query retrieves, without calling the model
    Search {
        /// Query to score chunks against
        query: String,

        /// Maximum number of chunks to show
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show document statistics
    Stats,
}

impl Commands {
    /// Interactive and long-running commands log to files instead of the terminal
    pub fn logs_to_file(&self) -> bool {
        matches!(self, Commands::Chat | Commands::Serve { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_with_global_flags() {
        let cli = Cli::try_parse_from(["docent", "ask", "What?", "--document", "report.pdf"])
            .unwrap();
        assert_eq!(cli.document, Some(PathBuf::from("report.pdf")));
        assert!(matches!(cli.command, Commands::Ask { ref question } if question == "What?"));
        assert!(!cli.command.logs_to_file());
    }

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::try_parse_from(["docent", "search", "tesla"]).unwrap();
        match cli.command {
            Commands::Search {
                query,
                limit,
                format,
            } => {
                assert_eq!(query, "tesla");
                assert_eq!(limit, 5);
                assert_eq!(format, "text");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_chat_logs_to_file() {
        let cli = Cli::try_parse_from(["docent", "--debug", "chat"]).unwrap();
        assert!(cli.debug);
        assert!(cli.command.logs_to_file());
    }
}
