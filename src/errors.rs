use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A file's header or keys do not line up with the expected columns
    #[error("Schema mismatch in {file}: expected [{expected}], found [{found}]")]
    SchemaMismatch {
        file: String,
        expected: String,
        found: String,
    },
    /// A record has no value for a numeric column
    #[error("Missing numeric field '{field}' in {file} (record {record})")]
    MissingNumericField {
        file: String,
        record: usize,
        field: String,
    },
    /// A numeric column holds text that is not a finite number
    #[error("Cannot convert '{value}' to a number for field '{field}' in {file} (record {record})")]
    TypeCoercion {
        file: String,
        record: usize,
        field: String,
        value: String,
    },
    /// The transform stage received a text value in a numeric column
    #[error("Non-numeric value in column '{field}' at row {row}")]
    NonNumericInput { row: usize, field: String },
    /// Writing the output file failed
    #[error("Failed to write {path}: {message}")]
    WriteError { path: String, message: String },
    /// Malformed CSV, JSON or XML content
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid configuration or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    pub(crate) fn write_error(path: &Path, err: impl std::fmt::Display) -> Self {
        AppError::WriteError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::InvalidInput(format!("Failed to parse config: {err}"))
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;
    use std::path::Path;

    #[test]
    fn test_schema_mismatch_display_names_file_and_headers() {
        let err = AppError::SchemaMismatch {
            file: "source/people.csv".to_string(),
            expected: "name,height,weight".to_string(),
            found: "height,name,weight".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("source/people.csv"));
        assert!(msg.contains("expected [name,height,weight]"));
        assert!(msg.contains("found [height,name,weight]"));
    }

    #[test]
    fn test_missing_numeric_field_display() {
        let err = AppError::MissingNumericField {
            file: "people.xml".to_string(),
            record: 3,
            field: "weight".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("weight"));
        assert!(msg.contains("people.xml"));
        assert!(msg.contains("record 3"));
    }

    #[test]
    fn test_type_coercion_display() {
        let err = AppError::TypeCoercion {
            file: "people.json".to_string(),
            record: 2,
            field: "height".to_string(),
            value: "tall".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'tall'"));
        assert!(msg.contains("height"));
    }

    #[test]
    fn test_write_error_helper_keeps_path() {
        let err = AppError::write_error(Path::new("out/result.csv"), "disk full");
        match err {
            AppError::WriteError { path, message } => {
                assert_eq!(path, "out/result.csv");
                assert_eq!(message, "disk full");
            }
            other => panic!("Expected WriteError, got {other:?}"),
        }
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::from(io);
        assert!(err.to_string().starts_with("IO error"));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::InvalidInput("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
