//! Query interpretation and confidence-gated result filtering for semantic
//! meal search.

pub mod config;
pub mod document;
pub mod error;
pub mod filter;
pub mod query_parser;
pub mod scoring;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
