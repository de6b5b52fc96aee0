//! Database error types.

use derive_more::{Display, Error};

/// Database error, classified just enough for the request layer.
#[derive(Debug, Clone, Display, Error)]
pub enum DbError {
    /// An insert or update violated a unique constraint.
    #[display("Unique constraint violation: {message}")]
    UniqueViolation {
        /// Constraint description reported by the driver.
        message: String,
    },
    /// Any other database failure, with caller location tracking.
    #[display("Database error: {message} at {file}:{line}")]
    Other {
        /// Error message.
        message: String,
        /// Line number where the error was raised.
        line: u32,
        /// Source file where the error was raised.
        file: &'static str,
    },
}

impl DbError {
    /// Creates a generic database error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        DbError::Other {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns true if this error came from a unique constraint.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DbError::UniqueViolation { .. })
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                DbError::UniqueViolation {
                    message: info.message().to_string(),
                }
            }
            other => DbError::new(format!("Diesel error: {}", other)),
        }
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        DbError::new(format!("Connection error: {}", err))
    }
}
