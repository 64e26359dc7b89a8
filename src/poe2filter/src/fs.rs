//! File system utilities for reading base files and writing the filter

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{Error, Result};

/// Read a whole text file, attaching the path to any error
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Collect files in a directory tree matching an extension, sorted by path
///
/// A missing directory yields no files. Extension should not include the dot.
pub fn walk_files_with_extension(path: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_extension(p, extension))
        .collect();

    files.sort();
    files
}

/// Collect immediate child files of a directory matching an extension, sorted by name
pub fn list_files_with_extension(path: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file_path = entry.path();
        if file_path.is_file() && has_extension(&file_path, extension) {
            files.push(file_path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Write a file through a temporary sibling that is renamed into place
///
/// The writer callback receives a buffered handle to the temporary file. If it
/// fails, or flushing fails, the temporary file is removed and `path` keeps its
/// previous contents.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let temp = NamedTempFile::new_in(dir).map_err(write_error)?;
    {
        let mut out = BufWriter::new(temp.as_file());
        write(&mut out)?;
        out.flush().map_err(write_error)?;
    }

    temp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_files_recursive_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/Spears.txt"), "").unwrap();
        fs::write(dir.path().join("Bows.TXT"), "").unwrap();
        fs::write(dir.path().join("notes.md"), "").unwrap();

        let files = walk_files_with_extension(dir.path(), "txt");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            [PathBuf::from("Bows.TXT"), PathBuf::from("b/nested/Spears.txt")]
        );
    }

    #[test]
    fn test_walk_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(walk_files_with_extension(&dir.path().join("missing"), "txt").is_empty());
    }

    #[test]
    fn test_list_files_depth_one() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/Deep.txt"), "").unwrap();
        fs::write(dir.path().join("Wands.txt"), "").unwrap();
        fs::write(dir.path().join("Staves.txt"), "").unwrap();

        let files = list_files_with_extension(dir.path(), "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["Staves.txt", "Wands.txt"]);

        assert!(list_files_with_extension(&dir.path().join("missing"), "txt")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.filter");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, |out| {
            out.write_all(b"new").map_err(|source| Error::Write {
                path: PathBuf::new(),
                source,
            })
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_keeps_previous_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filter.filter");
        fs::write(&path, "old").unwrap();

        let result = write_atomic(&path, |out| {
            out.write_all(b"partial").unwrap();
            Err(Error::InvalidAreaLevel("boom".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old");
        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
