//! File and directory creation.

use std::fs::OpenOptions;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace};

use crate::errors::{OpError, OpResult};
use crate::platform;

/// Create an empty regular file at `path`. Never overwrites: an existing
/// entry of any kind makes this fail.
pub fn create_file(path: &Path) -> OpResult {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(OpError::with_path("create file", path))?;
    debug!(path = %path.display(), "created file");
    Ok(())
}

/// Create a directory with `mode`.
///
/// Without `create_parents` exactly one directory is created and a missing
/// parent or an existing entry is an error. With it, every missing ancestor
/// is created with `mode`, components that already are directories are
/// skipped, and the first component that cannot be created stops the walk.
pub fn create_directory(path: &Path, create_parents: bool, mode: u32) -> OpResult {
    if !create_parents {
        platform::create_dir(path, mode).map_err(OpError::with_path("create directory", path))?;
        debug!(path = %path.display(), mode = format!("{:o}", mode), "created directory");
        return Ok(());
    }

    let mut current = PathBuf::new();
    for component in path.components() {
        current.push(component.as_os_str());
        // Drive prefixes and the root are the walk's starting point.
        if matches!(component, Component::Prefix(_) | Component::RootDir) {
            continue;
        }
        if current.is_dir() {
            continue;
        }
        platform::create_dir(&current, mode)
            .map_err(OpError::with_path("create directory", &current))?;
        trace!(path = %current.display(), "created ancestor");
    }
    debug!(path = %path.display(), mode = format!("{:o}", mode), "created directory with parents");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FsErrorKind;
    use tempfile::tempdir;

    #[test]
    fn create_file_refuses_existing() {
        let td = tempdir().unwrap();
        let f = td.path().join("f.txt");
        create_file(&f).unwrap();
        assert_eq!(std::fs::metadata(&f).unwrap().len(), 0);

        let err = create_file(&f).unwrap_err();
        assert_eq!(err.kind(), FsErrorKind::AlreadyExists);
    }

    #[test]
    fn single_directory_needs_parent() {
        let td = tempdir().unwrap();
        let deep = td.path().join("missing/child");
        assert!(create_directory(&deep, false, 0o755).is_err());
        assert!(!td.path().join("missing").exists());

        let one = td.path().join("one");
        create_directory(&one, false, 0o755).unwrap();
        assert!(one.is_dir());
        let err = create_directory(&one, false, 0o755).unwrap_err();
        assert_eq!(err.kind(), FsErrorKind::AlreadyExists);
    }

    #[test]
    fn parents_are_created_and_existing_skipped() {
        let td = tempdir().unwrap();
        std::fs::create_dir(td.path().join("a")).unwrap();
        let deep = td.path().join("a/b/c/d");
        create_directory(&deep, true, 0o755).unwrap();
        assert!(deep.is_dir());
        // Running again over an existing chain is a no-op.
        create_directory(&deep, true, 0o755).unwrap();
    }

    #[test]
    fn parents_stop_at_file_component() {
        let td = tempdir().unwrap();
        std::fs::write(td.path().join("file"), b"x").unwrap();
        let err = create_directory(&td.path().join("file/sub"), true, 0o755).unwrap_err();
        assert_eq!(err.kind(), FsErrorKind::AlreadyExists);
        assert!(!td.path().join("file/sub").exists());
    }

    #[cfg(unix)]
    #[test]
    fn created_ancestors_carry_mode() {
        use std::os::unix::fs::PermissionsExt;
        let td = tempdir().unwrap();
        let deep = td.path().join("x/y");
        create_directory(&deep, true, 0o751).unwrap();
        for p in [td.path().join("x"), deep] {
            let mode = std::fs::metadata(&p).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, 0o751, "{}", p.display());
        }
    }
}
