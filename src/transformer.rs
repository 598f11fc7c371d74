use crate::constants::{HEIGHT_COLUMN, INCHES_TO_METERS, POUNDS_TO_KILOGRAMS, WEIGHT_COLUMN};
use crate::errors::{AppError, AppResult};
use crate::models::{RowSet, Schema, Value};
use crate::utils::round_two_decimals;
use tracing::info;

/// A multiplicative unit conversion applied to one column.
#[derive(Debug, Clone, Copy)]
struct Conversion {
    column: &'static str,
    factor: f64,
}

const CONVERSIONS: [Conversion; 2] = [
    Conversion {
        column: HEIGHT_COLUMN,
        factor: INCHES_TO_METERS,
    },
    Conversion {
        column: WEIGHT_COLUMN,
        factor: POUNDS_TO_KILOGRAMS,
    },
];

/// Converts `height` from inches to meters and `weight` from pounds to kilograms,
/// in place, rounding each result to two decimals.
///
/// Every other column is left untouched and the row count and order are preserved.
///
/// # Errors
///
/// - `InvalidInput` if the schema has no `height` or `weight` column
/// - `NonNumericInput` if one of those cells holds text (1-based row number)
pub fn transform(row_set: &mut RowSet) -> AppResult<()> {
    info!(rows = row_set.len(), "Transform phase started");

    let targets = CONVERSIONS
        .iter()
        .map(|conversion| Ok((column_index(row_set.schema(), conversion.column)?, *conversion)))
        .collect::<AppResult<Vec<_>>>()?;

    for (row_idx, row) in row_set.rows_mut().iter_mut().enumerate() {
        for (index, conversion) in &targets {
            match row.value_mut(*index) {
                Some(Value::Number(n)) => *n = round_two_decimals(*n * conversion.factor),
                _ => {
                    return Err(AppError::NonNumericInput {
                        row: row_idx + 1,
                        field: conversion.column.to_string(),
                    })
                }
            }
        }
    }

    info!(rows = row_set.len(), "Transform phase ended");
    Ok(())
}

fn column_index(schema: &Schema, column: &str) -> AppResult<usize> {
    schema.index_of(column).ok_or_else(|| {
        AppError::InvalidInput(format!("Transform requires a '{column}' column"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Row;

    fn schema() -> Schema {
        Schema::new(
            &["name", "height", "weight", "city"],
            &["height", "weight"],
        )
        .unwrap()
    }

    fn row(name: &str, height: f64, weight: f64) -> Row {
        Row::new(vec![
            Value::Text(name.into()),
            Value::Number(height),
            Value::Number(weight),
            Value::Text("Oslo".into()),
        ])
    }

    #[test]
    fn test_transform_converts_reference_values() {
        let mut rows = RowSet::new(schema());
        rows.extend(vec![row("Ann", 70.0, 150.0)]).unwrap();

        transform(&mut rows).unwrap();

        assert_eq!(rows.value(0, "height"), Some(&Value::Number(1.78)));
        assert_eq!(rows.value(0, "weight"), Some(&Value::Number(68.04)));
    }

    #[test]
    fn test_transform_preserves_other_columns_and_order() {
        let mut rows = RowSet::new(schema());
        rows.extend(vec![
            row("Ann", 70.0, 150.0),
            row("Bo", 0.0, 0.0),
            row("Cy", 60.0, 100.0),
        ])
        .unwrap();

        transform(&mut rows).unwrap();

        assert_eq!(rows.len(), 3);
        let names: Vec<_> = rows.rows().iter().map(|r| r.get(0).cloned()).collect();
        assert_eq!(
            names,
            vec![
                Some(Value::Text("Ann".into())),
                Some(Value::Text("Bo".into())),
                Some(Value::Text("Cy".into()))
            ]
        );
        assert!(rows
            .rows()
            .iter()
            .all(|r| r.get(3) == Some(&Value::Text("Oslo".into()))));
        assert_eq!(rows.value(1, "height"), Some(&Value::Number(0.0)));
        assert_eq!(rows.value(2, "height"), Some(&Value::Number(1.52)));
        assert_eq!(rows.value(2, "weight"), Some(&Value::Number(45.36)));
    }

    #[test]
    fn test_transform_huge_weight_stays_finite() {
        let mut rows = RowSet::new(schema());
        rows.extend(vec![row("Big", 70.0, 1e307)]).unwrap();

        transform(&mut rows).unwrap();

        let weight = rows.value(0, "weight").and_then(Value::as_f64).unwrap();
        assert!(weight.is_finite());
        assert_eq!(weight, 1e307 * POUNDS_TO_KILOGRAMS);
        assert_eq!(rows.value(0, "height"), Some(&Value::Number(1.78)));
    }

    #[test]
    fn test_transform_empty_row_set() {
        let mut rows = RowSet::new(schema());
        transform(&mut rows).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_transform_rejects_text_in_numeric_column() {
        let mut rows = RowSet::new(schema());
        rows.extend(vec![
            row("Ann", 70.0, 150.0),
            Row::new(vec![
                Value::Text("Bo".into()),
                Value::Number(60.0),
                Value::Text("heavy".into()),
                Value::Text("Oslo".into()),
            ]),
        ])
        .unwrap();

        match transform(&mut rows).unwrap_err() {
            AppError::NonNumericInput { row, field } => {
                assert_eq!(row, 2);
                assert_eq!(field, "weight");
            }
            other => panic!("Expected NonNumericInput, got {other:?}"),
        }
    }

    #[test]
    fn test_transform_requires_height_and_weight() {
        let mut rows = RowSet::new(Schema::new(&["name", "height"], &["height"]).unwrap());
        assert!(matches!(
            transform(&mut rows),
            Err(AppError::InvalidInput(_))
        ));
    }
}
