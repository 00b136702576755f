pub mod chunker;
pub mod formatting;
pub mod loader;
pub mod manager;
pub mod retriever;
pub mod types;

pub use manager::KnowledgeBase;
pub use types::{Chunk, ChunkSet};
