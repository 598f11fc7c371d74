use crate::errors::{AppError, AppResult};
use crate::models::{RowSet, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the row set to `output_path` as CSV, replacing the file atomically.
///
/// The header holds the schema's column names in order, followed by one line per
/// row. Numbers are written with the shortest representation that reads back to the
/// same value.
///
/// # Behavior
///
/// - **Directories**: missing parent directories are created.
/// - **Atomic writes**: rows go to a temporary file next to the destination, which is
///   renamed over it only after everything was written and synced. On failure the
///   temporary file is removed and an existing destination keeps its old content.
///
/// # Errors
///
/// Returns `WriteError` for any failure while creating, writing or renaming.
pub fn write_csv(row_set: &RowSet, output_path: &Path) -> AppResult<()> {
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| AppError::write_error(output_path, e))?;

    let tmp = tempfile::Builder::new()
        .prefix(".etl-append-")
        .suffix(".csv.part")
        .tempfile_in(parent)
        .map_err(|e| AppError::write_error(output_path, e))?;

    write_rows(row_set, tmp.as_file()).map_err(|e| AppError::write_error(output_path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| AppError::write_error(output_path, e))?;

    // A replaced file keeps its mode; a new one gets the usual 0644 instead of the
    // temp file's 0600.
    let permissions = match fs::metadata(output_path) {
        Ok(meta) if meta.is_file() => Some(meta.permissions()),
        _ => new_file_permissions(),
    };
    if let Some(permissions) = permissions {
        tmp.as_file()
            .set_permissions(permissions)
            .map_err(|e| AppError::write_error(output_path, e))?;
    }

    // Dropping the NamedTempFile on an error path deletes it
    tmp.persist(output_path)
        .map_err(|e| AppError::write_error(output_path, e.error))?;

    info!(
        output = %output_path.display(),
        rows = row_set.len(),
        "Load phase completed"
    );
    Ok(())
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}

fn write_rows<W: Write>(row_set: &RowSet, out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(row_set.schema().names())?;
    for row in row_set.rows() {
        writer.write_record(row.values().iter().map(Value::to_string))?;
    }
    writer.flush()?;
    Ok(())
}
