//! Core error type.

use thiserror::Error;

/// Errors produced while installing the diagnostic sink.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a log sink has already been installed for this process")]
    AlreadySet(#[from] log::SetLoggerError),
}

pub type LoggingResult<T> = Result<T, LoggingError>;
