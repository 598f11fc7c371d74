use super::coerce::{coerce_field, RecordRef};
use crate::errors::{AppError, AppResult};
use crate::models::{Column, Row, Schema, Value};
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a line-delimited JSON file: one object per non-blank line.
pub fn read_json_lines(path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    let file = File::open(path).map_err(|e| {
        AppError::IoError(format!("Failed to open JSON file {}: {e}", path.display()))
    })?;
    read_json_lines_from(BufReader::new(file), path, schema)
}

/// Parses JSON lines from any buffered reader. `path` is only used in error messages.
///
/// Every object must carry exactly the schema's keys, in any order. Records are
/// numbered by line so errors point at the offending line.
pub(crate) fn read_json_lines_from<R: BufRead>(
    reader: R,
    path: &Path,
    schema: &Schema,
) -> AppResult<Vec<Row>> {
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| {
            AppError::IoError(format!(
                "Failed to read line {line_no} of {}: {e}",
                path.display()
            ))
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let value: JsonValue = serde_json::from_str(&line).map_err(|e| {
            AppError::ParseError(format!(
                "Invalid JSON in {} at line {line_no}: {e}",
                path.display()
            ))
        })?;
        let object = value.as_object().ok_or_else(|| {
            AppError::ParseError(format!(
                "Expected a JSON object in {} at line {line_no}",
                path.display()
            ))
        })?;

        let keys_match =
            object.len() == schema.len() && schema.names().all(|name| object.contains_key(name));
        if !keys_match {
            return Err(AppError::SchemaMismatch {
                file: format!("{} (line {line_no})", path.display()),
                expected: schema.joined_names(),
                found: object.keys().cloned().collect::<Vec<_>>().join(","),
            });
        }

        let at = RecordRef {
            file: path,
            record: line_no,
        };
        let values = schema
            .columns()
            .iter()
            .map(|column| json_field(column, &object[column.name.as_str()], at))
            .collect::<AppResult<Vec<_>>>()?;
        rows.push(Row::new(values));
    }

    Ok(rows)
}

fn json_field(column: &Column, value: &JsonValue, at: RecordRef) -> AppResult<Value> {
    match value {
        JsonValue::Null => coerce_field(column, None, at),
        JsonValue::String(s) => coerce_field(column, Some(s.as_str()), at),
        other => coerce_field(column, Some(other.to_string().as_str()), at),
    }
}
