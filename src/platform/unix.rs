//! Unix implementations of platform helpers.

use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io;
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};
use std::path::Path;

use crate::errors::FsErrorKind;

/// `rename(2)` replaces an existing non-directory destination atomically.
pub const HAS_ATOMIC_FILE_REPLACE: bool = true;

/// Unprivileged processes can create symbolic links.
pub const HAS_NATIVE_SYMLINKS: bool = true;

/// Map errno into the error taxonomy recursive operations branch on.
pub fn classify(e: &io::Error) -> FsErrorKind {
    match e.raw_os_error() {
        Some(libc::EEXIST) => FsErrorKind::AlreadyExists,
        Some(libc::ENOTEMPTY) => FsErrorKind::NotEmpty,
        Some(libc::EISDIR) => FsErrorKind::IsDirectory,
        Some(libc::EXDEV) => FsErrorKind::CrossDevice,
        Some(_) => FsErrorKind::Io,
        None => match e.kind() {
            io::ErrorKind::AlreadyExists => FsErrorKind::AlreadyExists,
            io::ErrorKind::DirectoryNotEmpty => FsErrorKind::NotEmpty,
            io::ErrorKind::IsADirectory => FsErrorKind::IsDirectory,
            io::ErrorKind::CrossesDevices => FsErrorKind::CrossDevice,
            _ => FsErrorKind::Io,
        },
    }
}

/// mkdir(2) with `mode`, then chmod to `mode` so the umask cannot strip bits.
pub fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    DirBuilder::new().mode(mode).create(path)?;
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

/// Permission bits (including setuid/setgid/sticky) of already-fetched metadata.
pub fn mode_of(meta: &fs::Metadata) -> u32 {
    meta.permissions().mode() & 0o7777
}

/// POSIX chmod.
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode & 0o7777))
}

/// symlink(2): create `link` pointing at `target`.
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Open log file for appending; set 0600 only when creating a new file.
/// If the file already exists, we preserve its existing permissions.
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let existed = path.exists();
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .mode(0o600)
        .custom_flags(libc::O_NOFOLLOW)
        .open(path)?;
    if !existed {
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn classify_errno_family() {
        let k = |code| classify(&io::Error::from_raw_os_error(code));
        assert_eq!(k(libc::EEXIST), FsErrorKind::AlreadyExists);
        assert_eq!(k(libc::ENOTEMPTY), FsErrorKind::NotEmpty);
        assert_eq!(k(libc::EISDIR), FsErrorKind::IsDirectory);
        assert_eq!(k(libc::EXDEV), FsErrorKind::CrossDevice);
        assert_eq!(k(libc::EACCES), FsErrorKind::Io);
    }

    #[test]
    fn create_dir_ignores_umask() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("wide");
        create_dir(&p, 0o777).unwrap();
        let mode = fs::metadata(&p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o777);
    }

    #[test]
    fn new_log_file_gets_0600() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new_log.txt");
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600, "newly created log file should be 0600");
    }

    #[test]
    fn log_file_symlink_is_not_followed() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.log");
        fs::write(&real, b"").unwrap();
        let link = dir.path().join("fm.log");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(open_log_file_secure_append(&link).is_err());
        assert_eq!(fs::read(&real).unwrap(), b"");
    }

    #[test]
    fn preserve_existing_log_file_mode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, b"hello").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let _f = open_log_file_secure_append(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640, "existing permissions should be preserved");
    }
}
