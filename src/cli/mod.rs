//! Interactive shell and script runner over the invoice wizard.

pub mod commands;
pub mod core;
pub mod forms;
pub mod help;
pub mod io;
pub mod output;
mod shell;

pub use self::core::{CliError, CliMode, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV_VAR};
