//! Terminal front end for the todo list.
//!
//! A [`Session`] owns the page state (theme, input draft) and a
//! `TodoSync` for the data. Each typed line becomes a [`Command`]; after the
//! command runs the session refreshes the list if it went stale and the
//! caller prints [`Session::view`].

pub mod command;
pub mod input;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use input::TodoInput;
pub use render::Renderer;
pub use session::{Reply, Session};
