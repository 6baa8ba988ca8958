//! Single-entry removal.

use std::fs;
use std::path::Path;
use tracing::trace;

use crate::errors::{OpError, OpResult};

/// Remove a regular file or a symbolic link (never its target).
/// Directories are rejected by the OS.
pub fn remove_file(path: &Path) -> OpResult {
    fs::remove_file(path).map_err(OpError::with_path("remove file", path))?;
    trace!(path = %path.display(), "removed file");
    Ok(())
}

/// Remove an empty directory.
pub fn remove_directory(path: &Path) -> OpResult {
    fs::remove_dir(path).map_err(OpError::with_path("remove directory", path))?;
    trace!(path = %path.display(), "removed directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FsErrorKind;
    use tempfile::tempdir;

    #[test]
    fn remove_file_rejects_directory() {
        let td = tempdir().unwrap();
        let d = td.path().join("d");
        fs::create_dir(&d).unwrap();
        assert!(remove_file(&d).is_err());
        assert!(d.is_dir());
    }

    #[test]
    fn remove_directory_requires_empty() {
        let td = tempdir().unwrap();
        let d = td.path().join("d");
        fs::create_dir(&d).unwrap();
        fs::write(d.join("f"), b"x").unwrap();

        let err = remove_directory(&d).unwrap_err();
        #[cfg(unix)]
        assert_eq!(err.kind(), FsErrorKind::NotEmpty);
        let _ = err;

        remove_file(&d.join("f")).unwrap();
        remove_directory(&d).unwrap();
        assert!(!d.exists());
    }

    #[cfg(unix)]
    #[test]
    fn remove_file_unlinks_symlink_only() {
        let td = tempdir().unwrap();
        let target = td.path().join("target");
        fs::write(&target, b"keep").unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        remove_file(&link).unwrap();
        assert!(fs::symlink_metadata(&link).is_err());
        assert_eq!(fs::read(&target).unwrap(), b"keep");
    }
}
