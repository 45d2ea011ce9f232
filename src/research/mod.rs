//! The research pipeline: expand → related questions → scholar search → answer.

pub(crate) mod aggregate;
pub(crate) mod engine;
pub(crate) mod expand;
pub(crate) mod related;
pub(crate) mod synthesize;

pub use aggregate::AggregateOptions;
pub use engine::{Research, ResearchReport};
pub use synthesize::Answerer;
