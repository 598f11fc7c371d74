// Default locations
pub const DEFAULT_SOURCE_DIR: &str = "data/source";
pub const DEFAULT_TARGET_DIR: &str = "data/output";
pub const DEFAULT_LOG_FILE: &str = "etl_append.log";

// Schema defaults
pub const DEFAULT_COLUMNS: &[&str] = &["name", "height", "weight"];
pub const DEFAULT_NUMERIC_COLUMNS: &[&str] = &["height", "weight"];

// Output naming
pub const OUTPUT_FILE_PREFIX: &str = "appended_output_";
pub const OUTPUT_FILE_EXTENSION: &str = "csv";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M";

// Recognized source extensions (compared case-insensitively)
pub const CSV_EXTENSIONS: &[&str] = &["csv"];
pub const JSON_LINES_EXTENSIONS: &[&str] = &["json", "jsonl"];
pub const XML_EXTENSIONS: &[&str] = &["xml"];

// Unit conversions
pub const HEIGHT_COLUMN: &str = "height";
pub const WEIGHT_COLUMN: &str = "weight";
pub const INCHES_TO_METERS: f64 = 0.0254;
pub const POUNDS_TO_KILOGRAMS: f64 = 0.45359237;
