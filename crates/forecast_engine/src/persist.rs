use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot use directory {path:?}: {message}")]
    Directory { path: PathBuf, message: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Create the directory holding `file` if it does not exist yet.
pub fn ensure_parent_dir(file: &Path) -> Result<PathBuf, PersistError> {
    let dir = match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if dir.exists() {
        if !dir.is_dir() {
            return Err(PersistError::Directory {
                path: dir,
                message: "not a directory".into(),
            });
        }
    } else {
        fs::create_dir_all(&dir).map_err(|e| PersistError::Directory {
            path: dir.clone(),
            message: e.to_string(),
        })?;
    }
    Ok(dir)
}

/// Write `content` to `path` so readers see either the old or the new file,
/// never a partial one.
pub fn replace_atomically(path: &Path, content: &[u8]) -> Result<(), PersistError> {
    let dir = ensure_parent_dir(path)?;

    let mut tmp = NamedTempFile::new_in(&dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}
