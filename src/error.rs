use thiserror::Error;

#[derive(Debug, Error)]
pub enum PsichainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("communication error: {0}")]
    Communication(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PsichainError>;
