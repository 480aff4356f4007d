//! Taskboard client shell.
//!
//! Wires the infrastructure adapters into the session core and exposes the
//! command-line surface used by the `taskboard` binary.

pub mod cli;
pub mod client;
pub mod commands;

pub use cli::{Cli, Command};
pub use client::Client;
pub use commands::run;
