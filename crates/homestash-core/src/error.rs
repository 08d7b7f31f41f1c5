//! Error types for homestash-core

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from the inventory store and the logic layered over it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field was missing or empty
    #[error("{0}")]
    Validation(String),

    /// A store constraint rejected the write (unique key, NOT NULL, foreign key)
    #[error("{message}")]
    Constraint { message: String, code: String },

    /// Any other storage failure
    #[error("{message}")]
    Storage {
        message: String,
        code: Option<String>,
    },
}

impl StoreError {
    /// Storage error with no engine code attached
    pub fn storage(message: impl Into<String>) -> Self {
        StoreError::Storage {
            message: message.into(),
            code: None,
        }
    }

    /// The engine's error code, when the failure came from SQLite
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Validation(_) => None,
            StoreError::Constraint { code, .. } => Some(code),
            StoreError::Storage { code, .. } => code.as_deref(),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::storage(format!("serialization: {}", err))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref failure, ref detail) => {
                let message = detail.clone().unwrap_or_else(|| failure.to_string());
                let code = sqlite_code_name(failure.code).to_string();
                if failure.code == rusqlite::ErrorCode::ConstraintViolation {
                    StoreError::Constraint { message, code }
                } else {
                    StoreError::Storage {
                        message,
                        code: Some(code),
                    }
                }
            }
            other => StoreError::storage(other.to_string()),
        }
    }
}

/// Map a rusqlite error code to the name SQLite uses in its C API.
#[cfg(feature = "sqlite")]
fn sqlite_code_name(code: rusqlite::ErrorCode) -> &'static str {
    use rusqlite::ErrorCode;

    match code {
        ErrorCode::ConstraintViolation => "SQLITE_CONSTRAINT",
        ErrorCode::DatabaseBusy => "SQLITE_BUSY",
        ErrorCode::DatabaseLocked => "SQLITE_LOCKED",
        ErrorCode::ReadOnly => "SQLITE_READONLY",
        ErrorCode::TypeMismatch => "SQLITE_MISMATCH",
        ErrorCode::TooBig => "SQLITE_TOOBIG",
        ErrorCode::CannotOpen => "SQLITE_CANTOPEN",
        ErrorCode::DiskFull => "SQLITE_FULL",
        ErrorCode::DatabaseCorrupt => "SQLITE_CORRUPT",
        ErrorCode::SystemIoFailure => "SQLITE_IOERR",
        ErrorCode::ApiMisuse => "SQLITE_MISUSE",
        _ => "SQLITE_ERROR",
    }
}

/// Configuration loading or validation error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Config parse error: {0}")]
    Parse(String),

    /// Value is out of valid range or inconsistent with another value
    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}
