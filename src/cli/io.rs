//! JSON I/O handling for CLI
//!
//! - Input: one JSON object per line
//! - Output: one JSON object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::CliResult;
use crate::schema::FieldError;

/// One parsed input line: `Ok(value)` or the JSON error message
pub type InputLine = Result<Value, String>;

/// Reads JSON values line by line, skipping blank lines
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<InputLine>> {
    input.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(Ok(serde_json::from_str(&line).map_err(|e| e.to_string()))),
        Err(e) => Some(Err(e.into())),
    })
}

/// Write a success response
pub fn write_response<W: Write>(out: &mut W, type_name: &str, collection: &str, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "type": type_name,
        "collection": collection,
        "data": data
    });
    write_line(out, &response)
}

/// Write an error response
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str, errors: &[FieldError]) -> CliResult<()> {
    let mut response = json!({
        "status": "error",
        "code": code,
        "message": message
    });
    if !errors.is_empty() {
        response["errors"] = serde_json::to_value(errors)?;
    }
    write_line(out, &response)
}

/// Write any serializable value as one line
pub fn write_line<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
