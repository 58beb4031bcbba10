//! Command-line interface
//!
//! One-shot commands over a configured store:
//! - init: create the data and schema directories
//! - create / get / set / append / remove / list: document operations
//! - schema: print a resolved schema, or a node of it
//!
//! Values for create/set/append arrive as JSON on stdin; every command
//! writes a single JSON object to stdout and exits non-zero on failure.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};
pub use io::{read_value, write_error, write_response};
