use crate::constants::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX, OUTPUT_TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

// Above this magnitude an f64 has no fractional digits left to round.
const ROUNDING_LIMIT: f64 = 1e15;

/// Rounds to two decimals, halves away from zero.
///
/// Values too large to carry a fractional part are returned unchanged, so a finite
/// input never rounds to infinity.
pub fn round_two_decimals(value: f64) -> f64 {
    if value.abs() >= ROUNDING_LIMIT {
        return value;
    }
    (value * 100.0).round() / 100.0
}

/// Builds the default output file name, e.g. `appended_output_2024-03-01_14-05.csv`.
pub fn timestamped_output_name(time: NaiveDateTime) -> String {
    format!(
        "{OUTPUT_FILE_PREFIX}{}.{OUTPUT_FILE_EXTENSION}",
        time.format(OUTPUT_TIMESTAMP_FORMAT)
    )
}
