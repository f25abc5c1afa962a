//! Link errors

use thiserror::Error;

/// Errors that can occur while operating the serial link
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("Link is not open")]
    NotOpen,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
