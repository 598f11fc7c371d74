use crate::constants::*;
use crate::errors::{AppError, AppResult};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Input file format, recognized by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    JsonLines,
    Xml,
}

impl SourceFormat {
    /// All formats in extraction order.
    pub const ALL: [SourceFormat; 3] = [Self::Csv, Self::JsonLines, Self::Xml];

    /// Returns a human-readable name for the format.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::JsonLines => "JSON lines",
            Self::Xml => "XML",
        }
    }

    /// Returns the file extensions (without the dot) that identify the format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Csv => CSV_EXTENSIONS,
            Self::JsonLines => JSON_LINES_EXTENSIONS,
            Self::Xml => XML_EXTENSIONS,
        }
    }

    /// Detects the format from a path's extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.into_iter().find(|format| {
            format
                .extensions()
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Ordered list of expected columns for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Builds a schema from column names, typing the ones listed in `numeric` as numeric.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if there are no columns, a name is blank or repeated,
    /// or a numeric column is not one of the columns.
    pub fn new<S: AsRef<str>>(columns: &[S], numeric: &[S]) -> AppResult<Self> {
        let names: Vec<&str> = columns.iter().map(|s| s.as_ref()).collect();
        let numeric: HashSet<&str> = numeric.iter().map(|s| s.as_ref()).collect();

        if names.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one column is required".into(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        for &name in &names {
            if name.trim().is_empty() {
                return Err(AppError::InvalidInput("Column names cannot be empty".into()));
            }
            if !seen.insert(name) {
                return Err(AppError::InvalidInput(format!(
                    "Column '{name}' is listed more than once"
                )));
            }
        }

        if let Some(unknown) = numeric.iter().find(|name| !seen.contains(**name)) {
            return Err(AppError::InvalidInput(format!(
                "Numeric column '{unknown}' is not one of the columns"
            )));
        }

        let columns = names
            .into_iter()
            .map(|name| Column {
                name: name.to_string(),
                kind: if numeric.contains(name) {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Text
                },
            })
            .collect();

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Column names joined with commas, used in error messages.
    pub(crate) fn joined_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(",")
    }
}

/// A single cell. Missing text is represented as an empty `Text`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One record, values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn value_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }
}

/// All rows of a run, sharing one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSet {
    schema: Schema,
    rows: Vec<Row>,
}

impl RowSet {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Appends rows, rejecting any whose width differs from the schema.
    pub fn extend(&mut self, rows: Vec<Row>) -> AppResult<()> {
        if let Some(bad) = rows.iter().find(|r| r.values.len() != self.schema.len()) {
            return Err(AppError::InvalidInput(format!(
                "Row has {} values but the schema has {} columns",
                bad.values.len(),
                self.schema.len()
            )));
        }
        self.rows.extend(rows);
        Ok(())
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a cell by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.schema.index_of(column)?;
        self.rows.get(row)?.get(index)
    }
}
