use thiserror::Error;

pub type Result<T, E = SortError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SortError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
