use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Task id must be non-empty")]
    EmptyTaskId,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AggregatorError>;
