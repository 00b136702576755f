use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::json;

use crate::knowledge::types::{DocumentStats, ScoredChunk};

pub fn format_search_results(results: &[ScoredChunk<'_>]) -> String {
    if results.is_empty() {
        return "No chunks in document".to_string();
    }

    let mut output = String::new();

    for result in results {
        output.push_str(&"━".repeat(60));
        output.push('\n');

        output.push_str(
            &format!(
                "Chunk #{} (chars {}-{})",
                result.chunk.index, result.chunk.char_start, result.chunk.char_end
            )
            .blue()
            .bold()
            .to_string(),
        );
        output.push('\n');

        // Content preview (first 200 chars)
        let content = if result.chunk.content.chars().count() > 200 {
            format!("{}...", truncate_chars(&result.chunk.content, 200))
        } else {
            result.chunk.content.clone()
        };
        output.push_str(&content);
        output.push('\n');

        output.push_str(
            &format!("{} overlapping words", result.score)
                .green()
                .to_string(),
        );
        output.push_str("\n\n");
    }

    output
}

pub fn format_search_results_json(results: &[ScoredChunk<'_>]) -> String {
    let items: Vec<_> = results
        .iter()
        .map(|r| {
            json!({
                "index": r.chunk.index,
                "score": r.score,
                "char_start": r.chunk.char_start,
                "char_end": r.chunk.char_end,
                "content": r.chunk.content,
            })
        })
        .collect();
    serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
}

pub fn format_stats(stats: &DocumentStats) -> String {
    let mut output = String::new();

    output.push_str(&"Document Statistics".bold().to_string());
    output.push('\n');
    output.push_str(&format!("Source: {}", stats.source));
    output.push('\n');
    output.push_str(&format!(
        "Pages: {} ({} with text)",
        stats.total_pages, stats.extracted_pages
    ));
    output.push('\n');
    output.push_str(&format!("Characters: {}", stats.total_chars));
    output.push('\n');
    output.push_str(&format!(
        "Chunks: {} x {} chars",
        stats.total_chunks, stats.chunk_size
    ));
    output.push('\n');
    output.push_str(&format!("Fingerprint: {}", stats.fingerprint.bright_black()));
    output.push('\n');
    output.push_str(&format!("Loaded: {}", format_relative_time(stats.loaded_at)));
    output.push('\n');

    output
}

fn format_relative_time(dt: DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(dt);

    if duration.num_days() > 0 {
        format!("{} days ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{} hours ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{} minutes ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn truncate_chars(input: &str, max_chars: usize) -> String {
    input.chars().take(max_chars).collect()
}
