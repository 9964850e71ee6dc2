//! Async synchronization layer between a UI and the remote todo API.
//!
//! # Overview
//! - [`QueryCache`] holds the last-fetched list under a fixed key and
//!   publishes [`CacheEvent`]s when it is invalidated or refreshed.
//! - [`HttpTransport`] executes the plain-data requests built by
//!   `todo_core::TodoClient`; [`ReqwestTransport`] is the network one.
//! - [`TodoSync`] exposes list/create/toggle/delete as async functions that
//!   return `Result`s and invalidate the cache after every successful
//!   mutation.

pub mod cache;
pub mod error;
pub mod service;
pub mod transport;

pub use cache::{CacheEvent, FetchTicket, QueryCache, QueryKey, QueryStatus};
pub use error::SyncError;
pub use service::{TodoCache, TodoSync, TODOS_KEY};
pub use transport::{HttpTransport, ReqwestTransport};
