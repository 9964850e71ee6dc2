//! Error types for the todo API client.
//!
//! # Design
//! The remote API is treated as a black box: any non-2xx response lands in
//! `HttpError` with the raw status code and body for debugging. Callers that
//! show errors to users collapse every variant into a generic per-operation
//! message (see [`Operation::failure_message`]).

use thiserror::Error;

/// Errors returned by `TodoClient` build/parse methods and transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A create was attempted with a title that is empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
}

/// The four operations of the todo API, used to pick a user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Toggle,
    Delete,
}

impl Operation {
    /// Generic message shown to the user when this operation fails. No
    /// distinction is made between HTTP statuses and transport failures.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Network response was not ok",
            Operation::Create => "Failed to add todo",
            Operation::Toggle => "Failed to update todo",
            Operation::Delete => "Failed to delete todo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = ApiError::HttpError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn failure_messages_are_generic() {
        assert_eq!(Operation::List.failure_message(), "Network response was not ok");
        assert_eq!(Operation::Create.failure_message(), "Failed to add todo");
        assert_eq!(Operation::Toggle.failure_message(), "Failed to update todo");
        assert_eq!(Operation::Delete.failure_message(), "Failed to delete todo");
    }
}
