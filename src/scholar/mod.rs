//! Google Scholar retrieval through SerpAPI.

pub mod client;
mod normalize;
pub mod types;

pub use client::{ScholarClient, ScholarSearch, SearchError};
pub use types::SearchResult;
