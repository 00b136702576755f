use anyhow::Result;
use sha2::{Digest, Sha256};

use crate::knowledge::types::{Chunk, ChunkSet};

pub struct TextChunker {
    chunk_size: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Normalize extracted pages and split them into fixed-size chunks
    /// Returns (normalized_text, chunks)
    pub fn chunk_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<(String, ChunkSet)> {
        if self.chunk_size == 0 {
            anyhow::bail!("chunk_size must be greater than zero");
        }

        let text = self.normalize(pages);
        let chunks = self.split_fixed(&text);
        Ok((text, ChunkSet::new(chunks)))
    }

    /// Join non-empty pages with newlines and collapse every whitespace run into one space
    pub fn normalize<S: AsRef<str>>(&self, pages: &[S]) -> String {
        let joined = pages
            .iter()
            .map(|p| p.as_ref().trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        joined.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Split text into consecutive chunks of exactly `chunk_size` characters
    /// The last chunk may be shorter. Never splits inside a character.
    fn split_fixed(&self, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;
        let mut char_start = 0;

        for ch in text.chars() {
            current.push(ch);
            current_len += 1;

            if current_len == self.chunk_size {
                let index = chunks.len();
                chunks.push(Chunk::new(index, std::mem::take(&mut current), char_start));
                char_start += current_len;
                current_len = 0;
            }
        }

        if !current.is_empty() {
            let index = chunks.len();
            chunks.push(Chunk::new(index, current, char_start));
        }

        chunks
    }

    /// Compute SHA256 hash of content
    pub fn compute_hash(&self, content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_text(text: &str, size: usize) -> (String, ChunkSet) {
        TextChunker::new(size).chunk_pages(&[text]).unwrap()
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        let text = "a".repeat(2500);
        let (_, chunks) = chunk_text(&text, 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.get(0).unwrap().char_len(), 1000);
        assert_eq!(chunks.get(1).unwrap().char_len(), 1000);
        assert_eq!(chunks.get(2).unwrap().char_len(), 500);
    }

    #[test]
    fn test_exact_multiple_has_no_trailing_chunk() {
        let text = "abcd".repeat(5);
        let (_, chunks) = chunk_text(&text, 4);
        assert_eq!(chunks.len(), 5);
        assert!(chunks.iter().all(|c| c.content == "abcd"));
    }

    #[test]
    fn test_concatenation_reproduces_normalized_text() {
        let pages = [
            "  The quick brown fox\n\njumps over  ",
            "",
            "the\tlazy dog.\r\nEnd of story.",
        ];
        let chunker = TextChunker::new(7);
        let (text, chunks) = chunker.chunk_pages(&pages).unwrap();

        assert_eq!(
            text,
            "The quick brown fox jumps over the lazy dog. End of story."
        );
        assert_eq!(chunks.text(), text);
        for chunk in chunks.iter().take(chunks.len() - 1) {
            assert_eq!(chunk.char_len(), 7);
        }
    }

    #[test]
    fn test_empty_pages_contribute_nothing() {
        let pages = ["", "   ", "\n\n", "only page"];
        let chunker = TextChunker::new(100);
        let (text, chunks) = chunker.chunk_pages(&pages).unwrap();
        assert_eq!(text, "only page");
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_pages_are_separated_by_a_single_space() {
        let pages = ["first page.", "second page."];
        let (text, _) = TextChunker::new(100).chunk_pages(&pages).unwrap();
        assert_eq!(text, "first page. second page.");
    }

    #[test]
    fn test_empty_document_yields_empty_set() {
        let pages: [&str; 0] = [];
        let (text, chunks) = TextChunker::new(10).chunk_pages(&pages).unwrap();
        assert!(text.is_empty());
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let result = TextChunker::new(0).chunk_pages(&["text"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "żółw ćma źrebię";
        let (_, chunks) = chunk_text(text, 4);
        assert_eq!(chunks.get(0).unwrap().content, "żółw");
        assert_eq!(chunks.text(), text);
        assert_eq!(chunks.len(), text.chars().count().div_ceil(4));
    }

    #[test]
    fn test_char_offsets_are_contiguous() {
        let (_, chunks) = chunk_text(&"x".repeat(25), 10);
        let offsets: Vec<(usize, usize)> =
            chunks.iter().map(|c| (c.char_start, c.char_end)).collect();
        assert_eq!(offsets, vec![(0, 10), (10, 20), (20, 25)]);
        let indexes: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indexes, vec![0, 1, 2]);
    }

    #[test]
    fn test_compute_hash_is_stable() {
        let chunker = TextChunker::new(10);
        let a = chunker.compute_hash("hello");
        let b = chunker.compute_hash("hello");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, chunker.compute_hash("hello!"));
    }
}
