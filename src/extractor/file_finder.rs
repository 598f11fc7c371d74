use crate::errors::{AppError, AppResult};
use crate::models::SourceFormat;
use std::path::{Path, PathBuf};

/// Finds the source files of every supported format directly inside `dir`.
///
/// Subdirectories are not descended into. The result holds one entry per format in
/// [`SourceFormat::ALL`] order, each with its files sorted by file name so repeated
/// runs over the same directory read files in the same order.
///
/// # Errors
///
/// Returns an error if `dir` is not a directory or cannot be read.
pub fn find_source_files(dir: &Path) -> AppResult<Vec<(SourceFormat, Vec<PathBuf>)>> {
    if !dir.is_dir() {
        return Err(AppError::IoError(format!(
            "Source directory does not exist: {}",
            dir.display()
        )));
    }

    let mut out: Vec<(SourceFormat, Vec<PathBuf>)> = SourceFormat::ALL
        .into_iter()
        .map(|format| (format, Vec::new()))
        .collect();

    let walker = walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| {
            AppError::IoError(format!(
                "Failed to read directory entry in {}: {e}",
                dir.display()
            ))
        })?;
        // Follows symlinks, unlike `entry.file_type()`
        if !entry.path().is_file() {
            continue;
        }
        if let Some(format) = SourceFormat::from_path(entry.path()) {
            if let Some((_, files)) = out.iter_mut().find(|(f, _)| *f == format) {
                files.push(entry.into_path());
            }
        }
    }

    Ok(out)
}
