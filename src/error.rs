use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid ticket: {0}")]
    InvalidTicket(String),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error("{0}")]
    Application(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("notification error: {0}")]
    Notification(String),
    #[error("ticket store error: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
