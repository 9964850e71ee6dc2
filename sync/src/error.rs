use thiserror::Error;
use todo_core::{ApiError, Operation};

/// A failed list or mutation, as surfaced to the user.
///
/// `Display` is the generic per-operation message; the underlying cause is
/// only reachable through `source()` so it ends up in logs, not on screen.
#[derive(Debug, Error)]
#[error("{}", .operation.failure_message())]
pub struct SyncError {
    pub operation: Operation,
    #[source]
    pub source: ApiError,
}

impl SyncError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        Self { operation, source }
    }
}
