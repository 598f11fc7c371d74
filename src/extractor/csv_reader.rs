use super::coerce::{coerce_field, RecordRef};
use crate::errors::{AppError, AppResult};
use crate::models::{Row, Schema};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a delimited-text file whose header must match the schema exactly.
pub fn read_csv(path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    let file = File::open(path).map_err(|e| {
        AppError::IoError(format!("Failed to open CSV file {}: {e}", path.display()))
    })?;
    read_csv_from(file, path, schema)
}

/// Parses CSV content from any reader. `path` is only used in error messages.
///
/// # Errors
///
/// - `SchemaMismatch` if the header omits, reorders or adds columns
/// - `ParseError` if a record has the wrong number of fields or is not valid UTF-8
/// - `MissingNumericField` / `TypeCoercion` for bad numeric cells
pub(crate) fn read_csv_from<R: Read>(reader: R, path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| {
            AppError::ParseError(format!("Failed to read CSV header of {}: {e}", path.display()))
        })?
        .clone();

    let header_matches =
        headers.len() == schema.len() && headers.iter().zip(schema.names()).all(|(h, n)| h == n);
    if !header_matches {
        return Err(AppError::SchemaMismatch {
            file: path.display().to_string(),
            expected: schema.joined_names(),
            found: headers.iter().collect::<Vec<_>>().join(","),
        });
    }

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AppError::ParseError(format!("Invalid CSV record in {}: {e}", path.display()))
        })?;
        let at = RecordRef {
            file: path,
            record: idx + 1,
        };

        let values = schema
            .columns()
            .iter()
            .zip(record.iter())
            .map(|(column, raw)| coerce_field(column, Some(raw), at))
            .collect::<AppResult<Vec<_>>>()?;
        rows.push(Row::new(values));
    }

    Ok(rows)
}
