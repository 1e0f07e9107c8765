//! Filesystem helpers shared by the pipeline stages

use std::path::{Path, PathBuf};

use crate::photogrammetry::common::error::{PipelineError, Result};

/// Creates `path` and any missing parents.
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Splits a path into (directory, stem, extension). The extension keeps its
/// leading dot and is empty when the file has none.
pub fn split_file(path: &Path) -> Result<(PathBuf, String, String)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PipelineError::FormatError(format!("no file name in {}", path.display())))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    Ok((parent_directory(path), stem.to_string(), extension))
}

/// Directory part of a path or output prefix, `.` for bare names.
pub fn parent_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Sorted list of the files in `directory` with the given extension
/// (without dot, compared case-insensitively).
pub fn list_files_with_extension(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !directory.is_dir() {
        return Err(PipelineError::MissingInput(directory.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Fails with `MissingInput` unless `path` is an existing file.
pub fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingInput(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_file() {
        let (dir, stem, ext) = split_file(Path::new("stereo/0001__0002/run-PC.tif")).unwrap();
        assert_eq!(dir, PathBuf::from("stereo/0001__0002"));
        assert_eq!(stem, "run-PC");
        assert_eq!(ext, ".tif");

        let (dir, stem, ext) = split_file(Path::new("dem")).unwrap();
        assert_eq!(dir, PathBuf::from("."));
        assert_eq!(stem, "dem");
        assert_eq!(ext, "");
    }

    #[test]
    fn test_list_files_sorted_by_extension() {
        let dir = tempdir().unwrap();
        for name in ["b.tif", "a.TIF", "c.tsai", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        create_dir(&dir.path().join("nested.tif")).unwrap();

        let files = list_files_with_extension(dir.path(), "tif").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.TIF", "b.tif"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let result = list_files_with_extension(&dir.path().join("absent"), "tif");
        assert!(matches!(result, Err(PipelineError::MissingInput(_))));
    }
}
