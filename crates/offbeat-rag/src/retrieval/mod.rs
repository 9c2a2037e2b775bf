//! Similarity scoring and ranking

pub mod search;

pub use search::{cosine_similarity, rank_passages, script_score, MAX_SCORE};
