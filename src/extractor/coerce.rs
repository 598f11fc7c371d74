use crate::errors::{AppError, AppResult};
use crate::models::{Column, ColumnKind, Value};
use std::path::Path;

/// Position of a record inside a source file, for error messages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RecordRef<'a> {
    pub file: &'a Path,
    pub record: usize,
}

/// Converts a raw field into a typed value for `column`.
///
/// `None` means the field was absent from the record. Text columns turn absence
/// into an empty string; numeric columns reject absent or blank values with
/// `MissingNumericField` and unparsable ones with `TypeCoercion`.
pub(crate) fn coerce_field(column: &Column, raw: Option<&str>, at: RecordRef) -> AppResult<Value> {
    match column.kind {
        ColumnKind::Text => Ok(Value::Text(raw.unwrap_or_default().to_string())),
        ColumnKind::Numeric => {
            let text = raw.map(str::trim).filter(|s| !s.is_empty()).ok_or_else(|| {
                AppError::MissingNumericField {
                    file: at.file.display().to_string(),
                    record: at.record,
                    field: column.name.clone(),
                }
            })?;

            match text.parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(Value::Number(n)),
                _ => Err(AppError::TypeCoercion {
                    file: at.file.display().to_string(),
                    record: at.record,
                    field: column.name.clone(),
                    value: text.to_string(),
                }),
            }
        }
    }
}
