//! Tooling Layer
//!
//! Line-oriented command shell and the CLI that drives it.

pub mod cli;
pub mod shell;

pub use cli::{Cli, CliContext, Commands};
pub use shell::{OutputFormat, Outcome, Shell};
