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
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{stdin, stdout, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::agent::{ConversationEngine, EngineSettings};
use crate::cli::Commands;
use crate::config::Config;
use crate::knowledge::formatting::{format_search_results, format_search_results_json, format_stats};
use crate::knowledge::KnowledgeBase;
use crate::llm::{ChatMessage, OpenAiClient};
use crate::tools::{contact_registry, LogNotifier, Notifier, PushoverNotifier};

pub async fn execute(config: &Config, command: Commands) -> Result<()> {
    // No document means no usable agent: loading failures abort here
    let kb = KnowledgeBase::load(&config.document).await?;

    match command {
        Commands::Chat => {
            let engine = build_engine(config, &kb)?;
            run_repl(&engine, config).await
        }
        Commands::Ask { question } => {
            let engine = build_engine(config, &kb)?;
            let answer = engine.respond(&question, &[]).await?;
            println!("{}", answer);
            Ok(())
        }
        Commands::Serve { bind } => {
            let engine = Arc::new(build_engine(config, &kb)?);
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            crate::server::serve(engine, &bind).await
        }
        Commands::Search {
            query,
            limit,
            format,
        } => {
            let results = kb.search(&query, limit);
            match format.as_str() {
                "json" => println!("{}", format_search_results_json(&results)),
                _ => print!("{}", format_search_results(&results)),
            }
            Ok(())
        }
        Commands::Stats => {
            print!("{}", format_stats(kb.stats()));
            Ok(())
        }
    }
}

fn build_engine(config: &Config, kb: &KnowledgeBase) -> Result<ConversationEngine> {
    let notifier: Arc<dyn Notifier> = if config.push.enabled {
        Arc::new(PushoverNotifier::new(&config.push)?)
    } else {
        Arc::new(LogNotifier)
    };
    let tools = Arc::new(contact_registry(notifier));
    let client = Arc::new(OpenAiClient::new(&config.model)?);

    Ok(ConversationEngine::new(
        kb.chunks(),
        tools,
        client,
        EngineSettings::from_config(config),
    ))
}

/// Interactive loop; the conversation history lives here, not in the engine
async fn run_repl(engine: &ConversationEngine, config: &Config) -> Result<()> {
    let mut reader = BufReader::new(stdin());
    let mut out = stdout();
    let mut history: Vec<ChatMessage> = Vec::new();
    let mut line = String::new();

    println!(
        "{} Ask about the {}. /reset clears the conversation, /exit quits.",
        config.agent.name.bold(),
        config.agent.subject
    );

    loop {
        out.write_all(format!("{} ", "you>".cyan().bold()).as_bytes())
            .await?;
        out.flush().await?;

        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            debug!("EOF received, leaving chat");
            break;
        }

        let message = line.trim();
        match message {
            "" => continue,
            "/exit" | "/quit" => break,
            "/reset" => {
                history.clear();
                println!("{}", "Conversation cleared".bright_black());
                continue;
            }
            _ => {}
        }

        match engine.respond(message, &history).await {
            Ok(answer) => {
                println!("{} {}\n", format!("{}>", config.agent.name).green().bold(), answer);
                history.push(ChatMessage::user(message));
                history.push(ChatMessage::assistant(answer));
            }
            Err(e) => {
                println!("{} {}\n", "error:".red().bold(), e);
            }
        }
    }

    Ok(())
}
