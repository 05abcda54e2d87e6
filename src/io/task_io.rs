//! JSON persistence for the task list.
//!
//! The data file is a single array of task objects. Loading never fails from
//! the caller's point of view: a missing or malformed file is an empty list.
//! Saving logs failures and leaves the in-memory tasks untouched.

use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::task::Task;

/// Error type for data file I/O
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize tasks: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
}

impl PersistError {
    /// True when the data file simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, PersistError::ReadError { source, .. } if source.kind() == ErrorKind::NotFound)
    }
}

/// Read and parse the data file.
///
/// An empty file or a top-level `null` is an empty list. Any malformed record
/// fails the whole document.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>, PersistError> {
    let text = fs::read_to_string(path).map_err(|e| PersistError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let tasks: Option<Vec<Task>> =
        serde_json::from_str(&text).map_err(|e| PersistError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(tasks.unwrap_or_default())
}

/// Serialize `tasks` and replace the data file with the result
pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<(), PersistError> {
    let content = serde_json::to_string_pretty(tasks)?;
    if let Some(dir) = parent_dir(path) {
        fs::create_dir_all(dir).map_err(|e| PersistError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    atomic_write(path, content.as_bytes()).map_err(|e| PersistError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load tasks, falling back to an empty list on any failure
pub fn load_tasks(path: &Path) -> Vec<Task> {
    match read_tasks(path) {
        Ok(tasks) => {
            tracing::debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
            tasks
        }
        Err(e) if e.is_not_found() => {
            tracing::info!(path = %path.display(), "no data file yet, starting with an empty list");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not load tasks, starting with an empty list");
            Vec::new()
        }
    }
}

/// Save tasks, logging instead of failing. Returns whether the file was written.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> bool {
    match write_tasks(path, tasks) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), count = tasks.len(), "saved tasks");
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "could not save tasks; changes are kept in memory only");
            false
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = parent_dir(path).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let mut done = Task::new(
            "Buy milk",
            "",
            NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            "Home",
            "Low",
        );
        done.completed = true;
        vec![
            Task::new(
                "Pay rent",
                "before noon",
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                "Home",
                "High",
            ),
            done,
        ]
    }

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        write_tasks(&path, &sample()).unwrap();
        assert_eq!(read_tasks(&path).unwrap(), sample());
    }

    #[test]
    fn load_missing_file_returns_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_tasks(&dir.path().join("tasks.json")).is_empty());
        let err = read_tasks(&dir.path().join("tasks.json")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn load_malformed_json_returns_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not valid json").unwrap();
        assert!(load_tasks(&path).is_empty());
        assert!(matches!(
            read_tasks(&path).unwrap_err(),
            PersistError::ParseError { .. }
        ));
    }

    #[test]
    fn one_bad_record_discards_the_whole_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"title":"ok","dueDate":"2024-01-01"},{"title":"bad","dueDate":"tomorrow"}]"#,
        )
        .unwrap();
        assert!(load_tasks(&path).is_empty());
    }

    #[test]
    fn empty_file_and_null_are_empty_lists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "").unwrap();
        assert!(read_tasks(&path).unwrap().is_empty());
        fs::write(&path, "null").unwrap();
        assert!(read_tasks(&path).unwrap().is_empty());
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/tasks.json");
        assert!(save_tasks(&path, &sample()));
        assert_eq!(load_tasks(&path), sample());
    }

    #[test]
    fn save_into_unwritable_location_fails_soft() {
        let dir = TempDir::new().unwrap();
        // A regular file where a directory is expected
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        assert!(!save_tasks(&blocker.join("tasks.json"), &sample()));
    }

    #[test]
    fn save_overwrites_previous_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        write_tasks(&path, &sample()).unwrap();
        write_tasks(&path, &sample()[..1]).unwrap();
        assert_eq!(read_tasks(&path).unwrap().len(), 1);
    }
}
