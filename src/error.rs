//! Error types for tdo
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, unknown task, invalid reorder)
//! - 4: Operation failed (io error, remote fetch failure)

use thiserror::Error;

/// Exit codes for the tdo CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for tdo operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task already exists: {0}")]
    DuplicateTask(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Remote load failed: {0}")]
    RemoteLoad(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArgument(_)
            | Error::InvalidConfig(_)
            | Error::TaskNotFound(_)
            | Error::DuplicateTask(_)
            | Error::InvalidOrder(_) => exit_codes::USER_ERROR,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::RemoteLoad(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }
}

/// Result type alias for tdo operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_errors_map_to_exit_code_2() {
        assert_eq!(
            Error::TaskNotFound("x".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::DuplicateTask("x".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
        assert_eq!(
            Error::InvalidOrder("mismatch".to_string()).exit_code(),
            exit_codes::USER_ERROR
        );
    }

    #[test]
    fn operation_failures_map_to_exit_code_4() {
        assert_eq!(
            Error::RemoteLoad("Failed to fetch todos".to_string()).exit_code(),
            exit_codes::OPERATION_FAILED
        );
        let io = Error::Io(std::io::Error::other("boom"));
        assert_eq!(io.exit_code(), exit_codes::OPERATION_FAILED);
    }
}
