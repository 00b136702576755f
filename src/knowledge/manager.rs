use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::DocumentConfig;
use crate::knowledge::chunker::TextChunker;
use crate::knowledge::retriever;
use crate::knowledge::types::{ChunkSet, DocumentStats, ScoredChunk};

/// The document knowledge base: chunks built once at startup, shared read-only
pub struct KnowledgeBase {
    chunks: Arc<ChunkSet>,
    stats: DocumentStats,
}

impl KnowledgeBase {
    /// Load, extract and chunk the configured document
    pub async fn load(config: &DocumentConfig) -> Result<Self> {
        let path = config.path.clone();
        let chunk_size = config.chunk_size;

        // Text extraction is CPU bound, keep it off the runtime threads
        let pages = tokio::task::spawn_blocking({
            let path = path.clone();
            move || super::loader::extract_pages(&path)
        })
        .await
        .context("Document extraction task failed")??;

        Self::from_pages(&path, &pages, chunk_size)
    }

    /// Build the knowledge base from already extracted pages
    pub fn from_pages<S: AsRef<str>>(source: &Path, pages: &[S], chunk_size: usize) -> Result<Self> {
        let chunker = TextChunker::new(chunk_size);
        let (text, chunks) = chunker.chunk_pages(pages)?;

        let extracted_pages = pages
            .iter()
            .filter(|p| !p.as_ref().trim().is_empty())
            .count();
        if extracted_pages < pages.len() {
            debug!(
                skipped = pages.len() - extracted_pages,
                "Skipped pages without extractable text"
            );
        }

        let stats = DocumentStats {
            source: source.display().to_string(),
            total_pages: pages.len(),
            extracted_pages,
            total_chars: text.chars().count(),
            total_chunks: chunks.len(),
            chunk_size,
            fingerprint: chunker.compute_hash(&text),
            loaded_at: Utc::now(),
        };

        info!(
            source = %stats.source,
            pages = stats.total_pages,
            extracted_pages = stats.extracted_pages,
            chunks = stats.total_chunks,
            fingerprint = %stats.fingerprint,
            "Document loaded"
        );

        Ok(Self {
            chunks: Arc::new(chunks),
            stats,
        })
    }

    pub fn chunks(&self) -> Arc<ChunkSet> {
        Arc::clone(&self.chunks)
    }

    pub fn stats(&self) -> &DocumentStats {
        &self.stats
    }

    /// Scored retrieval without calling the model
    pub fn search(&self, query: &str, limit: usize) -> Vec<ScoredChunk<'_>> {
        let mut scored = retriever::score_chunks(&self.chunks, query);
        scored.truncate(limit);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_reflect_pages_and_chunks() {
        let pages = ["First page text.", "", "Second page text."];
        let kb = KnowledgeBase::from_pages(Path::new("doc.txt"), &pages, 10).unwrap();
        let stats = kb.stats();

        assert_eq!(stats.total_pages, 3);
        assert_eq!(stats.extracted_pages, 2);
        assert_eq!(stats.total_chars, "First page text. Second page text.".len());
        assert_eq!(stats.total_chunks, 4);
        assert_eq!(stats.chunk_size, 10);
        assert_eq!(stats.fingerprint.len(), 64);
    }

    #[test]
    fn test_search_truncates_to_limit() {
        let pages = ["alpha beta gamma delta epsilon zeta eta theta"];
        let kb = KnowledgeBase::from_pages(Path::new("doc.txt"), &pages, 6).unwrap();
        let results = kb.search("gamma", 2);
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_load_missing_document_fails() {
        let config = DocumentConfig {
            path: "/no/such/document.pdf".into(),
            chunk_size: 1000,
        };
        assert!(KnowledgeBase::load(&config).await.is_err());
    }
}
