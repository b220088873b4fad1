//! JSON I/O handling for CLI
//!
//! - Input: JSON objects, one per line
//! - Output: JSON objects, one per line
//! - UTF-8 only
//!
//! The stream functions take any reader or writer; the commands pass
//! locked stdin and stdout.

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Read a single JSON request from the first line of `reader`
pub fn read_request<R: BufRead>(reader: &mut R) -> CliResult<Value> {
    let mut line = String::new();
    reader.read_line(&mut line)?;

    if line.trim().is_empty() {
        return Err(CliError::invalid_input("Empty input"));
    }

    let value: Value = serde_json::from_str(&line)?;
    Ok(value)
}

/// Read JSON requests line by line. Blank lines are skipped.
pub fn read_requests<R: BufRead>(reader: R) -> impl Iterator<Item = CliResult<Value>> {
    reader.lines().filter_map(|line| match line {
        Err(e) => Some(Err(CliError::from(e))),
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(serde_json::from_str(&line).map_err(CliError::from)),
    })
}

/// Write a success response
pub fn write_response<W: Write, T: Serialize>(writer: &mut W, data: &T) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    write_json(writer, &response)
}

/// Write an error response
pub fn write_error<W: Write>(writer: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    write_json(writer, &response)
}

/// Write any serializable value as one JSON line
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
