//! JSON I/O for the CLI
//!
//! Input: one JSON value via stdin. Output: one JSON object via stdout,
//! `{"status":"ok","data":...}` on success and
//! `{"status":"error","code":...,"message":...}` on failure.

use std::io::{self, Read, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Reads a single JSON value from stdin.
pub fn read_value() -> CliResult<Value> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    if input.trim().is_empty() {
        return Err(CliError::io_error("Expected a JSON value on stdin"));
    }

    Ok(serde_json::from_str(input.trim())?)
}

/// Writes a success response to stdout.
pub fn write_response(data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_line(&response)
}

/// Writes an error response to stdout.
pub fn write_error(error: &CliError) -> CliResult<()> {
    let mut response = serde_json::json!({
        "status": "error",
        "code": error.code(),
        "message": error.message()
    });
    if let Some(details) = error.details() {
        response["details"] = details.clone();
    }
    write_line(&response)
}

fn write_line(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
