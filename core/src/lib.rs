//! Synchronous API client core for the todo service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A transport owned by the
//! caller executes the actual HTTP round-trip, making the core fully
//! deterministic and testable.
//!
//! # Design
//! - `TodoClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `ThemeStore` is the only piece of UI state that lives here; it has no
//!   I/O at all and is owned by whichever session renders the list.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod theme;
pub mod types;

pub use client::TodoClient;
pub use config::ClientConfig;
pub use error::{ApiError, Operation};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use theme::{Theme, ThemeStore};
pub use types::{CreateTodo, Todo, TodoId, UpdateTodo};
