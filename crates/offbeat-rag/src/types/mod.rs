//! Core types for the travel advisor

pub mod query;
pub mod response;

pub use query::{Query, QueryRequest};
pub use response::{Completion, QueryResponse, RetrievedPassage};
