use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// A fixed-size slice of the normalized document text
#[derive(Debug, Clone)]
pub struct Chunk {
    pub index: usize,
    pub content: String,
    pub char_start: usize,
    pub char_end: usize,
    tokens: HashSet<String>,
}

impl Chunk {
    pub fn new(index: usize, content: String, char_start: usize) -> Self {
        let char_end = char_start + content.chars().count();
        let tokens = crate::knowledge::retriever::tokenize(&content);
        Self {
            index,
            content,
            char_start,
            char_end,
            tokens,
        }
    }

    /// Distinct lowercase word tokens of this chunk
    pub fn tokens(&self) -> &HashSet<String> {
        &self.tokens
    }

    #[cfg(test)]
    pub fn char_len(&self) -> usize {
        self.char_end - self.char_start
    }
}

/// Ordered, immutable set of chunks built once at startup
#[derive(Debug, Clone, Default)]
pub struct ChunkSet {
    chunks: Vec<Chunk>,
}

impl ChunkSet {
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.chunks.iter()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    /// Concatenation of all chunks, equal to the normalized document text
    #[cfg(test)]
    pub fn text(&self) -> String {
        self.chunks.iter().map(|c| c.content.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ChunkSet {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

/// Chunk paired with its overlap score for a single query
#[derive(Debug, Clone, Copy)]
pub struct ScoredChunk<'a> {
    pub score: usize,
    pub chunk: &'a Chunk,
}

/// Statistics about the loaded document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentStats {
    pub source: String,
    pub total_pages: usize,
    pub extracted_pages: usize,
    pub total_chars: usize,
    pub total_chunks: usize,
    pub chunk_size: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}
