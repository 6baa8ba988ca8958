//! Windows implementations of platform helpers.
//!
//! Notes:
//! - Windows lacks POSIX mode semantics; only the readonly attribute is mirrored.
//! - Symlink creation needs elevation unless developer mode is on, so link
//!   creation may go through the external `win_helper` executable.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use windows_sys::Win32::Foundation::{
    ERROR_ALREADY_EXISTS, ERROR_DIR_NOT_EMPTY, ERROR_FILE_EXISTS, ERROR_NOT_SAME_DEVICE,
};

use crate::errors::{FsErrorKind, OpError, OpResult};

/// Existing-file conflicts are reported instead of replaced during merges.
pub const HAS_ATOMIC_FILE_REPLACE: bool = false;

/// Unprivileged symlink creation is not guaranteed.
pub const HAS_NATIVE_SYMLINKS: bool = false;

const HELPER_NAME: &str = "win_helper.exe";

/// Map Win32 error codes into the error taxonomy recursive operations branch on.
pub fn classify(e: &io::Error) -> FsErrorKind {
    match e.raw_os_error().map(|c| c as u32) {
        Some(ERROR_ALREADY_EXISTS) | Some(ERROR_FILE_EXISTS) => FsErrorKind::AlreadyExists,
        Some(ERROR_DIR_NOT_EMPTY) => FsErrorKind::NotEmpty,
        Some(ERROR_NOT_SAME_DEVICE) => FsErrorKind::CrossDevice,
        _ => match e.kind() {
            io::ErrorKind::AlreadyExists => FsErrorKind::AlreadyExists,
            io::ErrorKind::DirectoryNotEmpty => FsErrorKind::NotEmpty,
            io::ErrorKind::IsADirectory => FsErrorKind::IsDirectory,
            io::ErrorKind::CrossesDevices => FsErrorKind::CrossDevice,
            _ => FsErrorKind::Io,
        },
    }
}

/// CreateDirectory; `mode` only decides the readonly attribute.
pub fn create_dir(path: &Path, mode: u32) -> io::Result<()> {
    fs::create_dir(path)?;
    set_mode(path, mode)
}

/// Synthesized mode: 0o555 for readonly entries, 0o777 otherwise.
pub fn mode_of(meta: &fs::Metadata) -> u32 {
    if meta.permissions().readonly() { 0o555 } else { 0o777 }
}

/// Mirror the owner-write bit onto the readonly attribute.
pub fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_readonly(mode & 0o200 == 0);
    fs::set_permissions(path, perms)
}

/// Native symlink creation; fails without the required privilege.
pub fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    use std::os::windows::fs::{symlink_dir, symlink_file};
    let use_dir = target.metadata().map(|m| m.is_dir()).unwrap_or(false);
    if use_dir {
        symlink_dir(target, link)
    } else {
        symlink_file(target, link)
    }
}

/// Location of the elevated helper: next to the running executable.
pub fn symlink_helper_path() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "executable has no parent"))?;
    Ok(dir.join(HELPER_NAME))
}

/// Run `win_helper -s <target> <link>`. Arguments are passed as a vector;
/// `Command` quotes them for the Windows command line.
pub fn run_symlink_helper(target: &Path, link: &Path) -> OpResult {
    let helper = symlink_helper_path().map_err(OpError::with_path("locate symlink helper", link))?;
    let status = Command::new(&helper)
        .arg("-s")
        .arg(target)
        .arg(link)
        .status()
        .map_err(OpError::with_path("run symlink helper", &helper))?;
    if status.success() {
        Ok(())
    } else {
        Err(OpError::HelperFailed {
            helper,
            status: status.to_string(),
        })
    }
}

/// Open log file for appending (no symlink defense available via std on Windows).
pub fn open_log_file_secure_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    OpenOptions::new().create(true).append(true).open(path)
}
