//! Error types for lockstamp.
//!
//! Only recoverable conditions live here. Misusing a [`LastWrite`] (serializing
//! or comparing the uninitialized placeholder) panics instead.
//!
//! [`LastWrite`]: crate::last_write::LastWrite

use crate::exit_codes;
use thiserror::Error;

/// Main error type for lockstamp operations.
#[derive(Error, Debug)]
pub enum StampError {
    /// User provided invalid arguments, configuration, or token text.
    #[error("{0}")]
    UserError(String),

    /// Reading or writing a file failed.
    #[error("I/O failed: {0}")]
    IoError(String),

    /// Lock could not be acquired or is not usable in the requested mode.
    #[error("Lock acquisition failed: {0}")]
    LockError(String),
}

impl StampError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            StampError::UserError(_) => exit_codes::USER_ERROR,
            StampError::IoError(_) => exit_codes::IO_FAILURE,
            StampError::LockError(_) => exit_codes::LOCK_FAILURE,
        }
    }
}

/// Result type alias for lockstamp operations.
pub type Result<T> = std::result::Result<T, StampError>;
