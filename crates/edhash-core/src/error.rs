use thiserror::Error;

pub type EdhashResult<T> = Result<T, EdhashError>;

#[derive(Debug, Error)]
pub enum EdhashError {
    #[error("digest length mismatch: expected {expected} bytes, got {actual}")]
    DigestLength { expected: usize, actual: usize },

    #[error("invalid digest hex: {0}")]
    InvalidHex(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
