use std::io;

use thiserror::Error;

/// The only failures that escape the reader. Malformed tokens never do.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("input stream closed")]
    InputClosed,
    #[error("console i/o failed: {0}")]
    Io(#[from] io::Error),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
