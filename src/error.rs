//! Error handling for projsnap
//!
//! Per-file read failures never reach this type; they are written inline
//! into the snapshot. Everything here aborts the run.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for projsnap operations
#[derive(Error, Debug)]
pub enum SnapError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The snapshot file itself could not be created
    #[error("Cannot create output file {}: {source}", .path.display())]
    OutputCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed exclusion pattern
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Specialized Result type for projsnap operations
pub type Result<T> = std::result::Result<T, SnapError>;

/// Creates a SnapError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::SnapError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Lets main keep an io::Result signature
impl From<SnapError> for io::Error {
    fn from(err: SnapError) -> Self {
        match err {
            SnapError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
