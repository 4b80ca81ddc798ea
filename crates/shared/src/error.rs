use std::fmt;

use thiserror::Error;

use crate::domain::FaultCategory;

/// A demonstrated fault. The display text is exactly what the user sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    #[error("Error: File not found or cannot be read. Please try again.")]
    Unreadable,
    #[error("Error: The specified file does not exist. Try again.")]
    FileMissing,
    #[error("Reached the end of the file.")]
    EndOfStream,
    #[error("Error: Unable to read the file. Try again.")]
    StreamUnreadable,
    #[error("Error: Failed to connect to the database. Check your credentials.")]
    ConnectFailed,
    #[error("Error: Class not found. Check the name and try again.")]
    TypeNotFound,
    #[error("Error: Division by zero is not allowed.")]
    DivisionByZero,
    #[error("Error: You tried to access a null object.")]
    NullAccess,
    #[error("Error: Index out of range. Try again.")]
    IndexOutOfRange,
    #[error("Error: You cannot cast that object to the desired type.")]
    InvalidCast,
    #[error("Error: Negative sleep durations are not allowed.")]
    NegativeDuration,
    #[error("Sleep was interrupted.")]
    Interrupted,
    #[error("Error: Invalid number format. Enter digits only.")]
    InvalidNumber,
}

impl Fault {
    pub fn category(self) -> FaultCategory {
        match self {
            Fault::Unreadable => FaultCategory::Io,
            Fault::FileMissing => FaultCategory::FileNotFound,
            Fault::EndOfStream | Fault::StreamUnreadable => FaultCategory::EndOfFile,
            Fault::ConnectFailed => FaultCategory::Sql,
            Fault::TypeNotFound => FaultCategory::ClassNotFound,
            Fault::DivisionByZero => FaultCategory::Arithmetic,
            Fault::NullAccess => FaultCategory::NullPointer,
            Fault::IndexOutOfRange => FaultCategory::IndexOutOfBounds,
            Fault::InvalidCast => FaultCategory::ClassCast,
            Fault::NegativeDuration | Fault::Interrupted => FaultCategory::IllegalArgument,
            Fault::InvalidNumber => FaultCategory::NumberFormat,
        }
    }
}

/// Result of one demonstration, handed back to the menu for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(String),
    Failure {
        fault: Fault,
        /// Underlying error text. Logged, never shown.
        detail: Option<String>,
    },
}

impl Outcome {
    pub fn success(message: impl Into<String>) -> Self {
        Outcome::Success(message.into())
    }

    pub fn failure(fault: Fault) -> Self {
        Outcome::Failure {
            fault,
            detail: None,
        }
    }

    pub fn failure_with(fault: Fault, detail: impl fmt::Display) -> Self {
        Outcome::Failure {
            fault,
            detail: Some(detail.to_string()),
        }
    }

    pub fn fault(&self) -> Option<Fault> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { fault, .. } => Some(*fault),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(message) => f.write_str(message),
            Outcome::Failure { fault, .. } => write!(f, "{fault}"),
        }
    }
}
