use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector index query failed: {0}")]
    Index(String),
}

pub type Result<T> = std::result::Result<T, Error>;
