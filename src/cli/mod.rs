//! Front end - command parsing and the session that runs commands.
//!
//! - [`Command`] - One parsed line (`insert 5`, `range 1 9`, `save`, ...)
//! - [`Session`] - Owns a tree and its snapshot file, executes commands

pub mod command;
mod session;

pub use command::{Command, HELP};
pub use session::{Flow, Session};
