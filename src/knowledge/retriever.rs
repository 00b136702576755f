use std::collections::HashSet;

use crate::knowledge::types::{Chunk, ChunkSet, ScoredChunk};

/// Split text into distinct lowercase tokens (runs of alphanumerics and underscores)
pub fn tokenize(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Score every chunk by the number of distinct query tokens it contains
/// Result is sorted by score descending; equal scores keep document order.
pub fn score_chunks<'a>(chunks: &'a ChunkSet, query: &str) -> Vec<ScoredChunk<'a>> {
    let query_tokens = tokenize(query);

    let mut scored: Vec<ScoredChunk<'a>> = chunks
        .iter()
        .map(|chunk| ScoredChunk {
            score: query_tokens.intersection(chunk.tokens()).count(),
            chunk,
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}

/// Return up to `top_n` chunks most relevant to the query
pub fn find_relevant<'a>(chunks: &'a ChunkSet, query: &str, top_n: usize) -> Vec<&'a Chunk> {
    score_chunks(chunks, query)
        .into_iter()
        .take(top_n)
        .map(|s| s.chunk)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::chunker::TextChunker;

    fn set_of(parts: &[&str]) -> ChunkSet {
        let chunks = parts
            .iter()
            .enumerate()
            .map(|(i, p)| Chunk::new(i, p.to_string(), 0))
            .collect();
        ChunkSet::new(chunks)
    }

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokens = tokenize("Hello, World! snake_case and dash-case 2020");
        let expected: HashSet<String> = [
            "hello",
            "world",
            "snake_case",
            "and",
            "dash",
            "case",
            "2020",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(tokens, expected);
    }

    #[test]
    fn test_tokenize_punctuation_only() {
        assert!(tokenize("!!! ... ???").is_empty());
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_duplicates_do_not_increase_score() {
        let chunks = set_of(&["rust rust rust rust", "rust language"]);
        let scored = score_chunks(&chunks, "rust language");
        assert_eq!(scored[0].chunk.index, 1);
        assert_eq!(scored[0].score, 2);
        assert_eq!(scored[1].score, 1);
    }

    #[test]
    fn test_ties_preserve_document_order() {
        let chunks = set_of(&["alpha one", "beta two", "alpha three", "gamma"]);
        let result = find_relevant(&chunks, "alpha", 4);
        let order: Vec<usize> = result.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_result_length_is_bounded() {
        let chunks = set_of(&["a", "b", "c"]);
        assert_eq!(find_relevant(&chunks, "a", 2).len(), 2);
        assert_eq!(find_relevant(&chunks, "a", 5).len(), 3);
        assert_eq!(find_relevant(&ChunkSet::default(), "a", 5).len(), 0);
    }

    #[test]
    fn test_no_overlap_still_returns_chunks() {
        let chunks = set_of(&["one", "two", "three"]);
        let result = find_relevant(&chunks, "unrelated words", 2);
        let order: Vec<usize> = result.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_retrieval_is_deterministic() {
        let chunks = set_of(&["x y", "y z", "z x", "x y z"]);
        let first: Vec<usize> = find_relevant(&chunks, "x z", 3)
            .iter()
            .map(|c| c.index)
            .collect();
        for _ in 0..10 {
            let again: Vec<usize> = find_relevant(&chunks, "x z", 3)
                .iter()
                .map(|c| c.index)
                .collect();
            assert_eq!(first, again);
        }
        assert_eq!(first, vec![2, 3, 0]);
    }

    #[test]
    fn test_single_chunk_document_end_to_end() {
        let text = "Tesla produced 500000 vehicles in 2020. Revenue grew significantly.";
        let (_, chunks) = TextChunker::new(1000).chunk_pages(&[text]).unwrap();
        assert_eq!(chunks.len(), 1);

        let scored = score_chunks(&chunks, "How many vehicles did Tesla produce?");
        assert!(scored[0].score >= 2);

        let result = find_relevant(&chunks, "How many vehicles did Tesla produce?", 5);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].content, text);
    }
}
