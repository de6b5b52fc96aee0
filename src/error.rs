//! Request-level error taxonomy.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use derive_more::{Display, Error};
use serde_json::json;
use tracing::{debug, error};

use crate::db::DbError;

/// Errors surfaced by the board service and its decision rules.
///
/// Every variant is recoverable at the request boundary: the HTTP layer maps
/// each to a status code and a user-facing message, and the process never
/// treats one as fatal.
#[derive(Debug, Clone, Display, Error)]
pub enum Error {
    /// No verified identity accompanied the request.
    #[display("Unauthorized")]
    Unauthenticated,
    /// The identity does not own the target board.
    #[display("{message}")]
    AccessDenied {
        /// User-facing message.
        message: String,
    },
    /// The referenced board or goal does not exist.
    #[display("{message}")]
    NotFound {
        /// User-facing message.
        message: String,
    },
    /// Malformed input: empty text, out-of-range position or year.
    #[display("{message}")]
    Validation {
        /// User-facing message.
        message: String,
    },
    /// Mutation rejected by the board/goal state machine.
    #[display("{message}")]
    IllegalTransition {
        /// User-facing message.
        message: String,
    },
    /// Duplicate goal position on the same board.
    #[display("{message}")]
    Conflict {
        /// User-facing message.
        message: String,
    },
    /// The persistence layer failed; surfaced as an opaque server error.
    #[display("{source}")]
    Store {
        /// Underlying database error.
        source: DbError,
    },
}

impl Error {
    /// Creates an access-denied error.
    pub fn access_denied(message: impl Into<String>) -> Self {
        Error::AccessDenied {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation {
            message: message.into(),
        }
    }

    /// Creates an illegal-transition error.
    pub fn illegal_transition(message: impl Into<String>) -> Self {
        Error::IllegalTransition {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Error::Conflict {
            message: message.into(),
        }
    }
}

impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        // The only unique constraint in the schema is (board_id, position).
        if err.is_unique_violation() {
            Error::conflict("A goal already exists at this position")
        } else {
            Error::Store { source: err }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::AccessDenied { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Validation { .. } | Error::IllegalTransition { .. } => StatusCode::BAD_REQUEST,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            Error::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &self {
            Error::Store { source } => {
                error!(error = %source, "Store failure while handling request");
                "Internal server error".to_string()
            }
            other => {
                debug!(status = %status, error = %other, "Request rejected");
                other.to_string()
            }
        };

        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}
