use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Audit endpoint returned {status} for task {task_id}")]
    BadStatus {
        task_id: String,
        status: reqwest::StatusCode,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
