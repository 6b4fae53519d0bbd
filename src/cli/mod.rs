//! Command line interface.

pub mod args;
pub mod commands;

pub use args::{CategorizerArgs, Command};
pub use commands::execute_command;
