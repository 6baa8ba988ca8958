//! Human-readable descriptions of OS failures.
//!
//! `OpError::Os` renders through `describe`, so every reported failure names
//! the operation, the path, the OS message and, where it helps, a hint about
//! what the user can do next.

use std::io;
use std::path::Path;

/// Format "<op> '<path>': <error>" plus a platform-aware hint and the raw code.
pub fn describe(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);

    if let Some(code) = e.raw_os_error() {
        if let Some(hint) = os_hint(code) {
            msg.push_str(" (");
            msg.push_str(hint);
            msg.push(')');
        }
        msg.push_str(&format!(" [os code: {}]", code));
    } else if let Some(hint) = kind_hint(e.kind()) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }

    msg
}

#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    match code {
        libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
        libc::EXDEV => Some("cross-filesystem; atomic rename not possible"),
        libc::EBUSY => Some("resource busy"),
        libc::ENOENT => Some("path not found"),
        libc::EEXIST => Some("already exists; choose another conflict policy"),
        libc::ENOTEMPTY => Some("directory not empty"),
        libc::EISDIR => Some("is a directory"),
        libc::ENOTDIR => Some("a path component is not a directory"),
        libc::ENOSPC => Some("insufficient space on device"),
        libc::EROFS => Some("read-only filesystem"),
        libc::ELOOP => Some("too many symbolic link levels"),
        libc::ENAMETOOLONG => Some("filename or path too long"),
        _ => None,
    }
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    use windows_sys::Win32::Foundation::{
        ERROR_ACCESS_DENIED, ERROR_ALREADY_EXISTS, ERROR_DIR_NOT_EMPTY, ERROR_DISK_FULL,
        ERROR_FILE_EXISTS, ERROR_FILE_NOT_FOUND, ERROR_NOT_SAME_DEVICE, ERROR_PATH_NOT_FOUND,
        ERROR_PRIVILEGE_NOT_HELD, ERROR_SHARING_VIOLATION,
    };
    match code as u32 {
        ERROR_ACCESS_DENIED => Some("access denied; check permissions"),
        ERROR_NOT_SAME_DEVICE => Some("not same device; atomic rename not possible"),
        ERROR_SHARING_VIOLATION => Some("sharing violation; file is in use"),
        ERROR_FILE_NOT_FOUND | ERROR_PATH_NOT_FOUND => Some("path not found"),
        ERROR_FILE_EXISTS | ERROR_ALREADY_EXISTS => Some("already exists; choose another conflict policy"),
        ERROR_DIR_NOT_EMPTY => Some("directory not empty"),
        ERROR_DISK_FULL => Some("insufficient disk space"),
        ERROR_PRIVILEGE_NOT_HELD => Some("symlink creation requires elevation or developer mode"),
        _ => None,
    }
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found"),
        io::ErrorKind::AlreadyExists => Some("already exists; choose another conflict policy"),
        io::ErrorKind::WriteZero => Some("device accepted no data"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_op_and_path() {
        let e = io::Error::new(io::ErrorKind::NotFound, "gone");
        let msg = describe("remove file", Path::new("/tmp/x"), &e);
        assert!(msg.starts_with("remove file '/tmp/x': gone"));
        assert!(msg.contains("path not found"));
    }

    #[cfg(unix)]
    #[test]
    fn raw_code_is_appended() {
        let e = io::Error::from_raw_os_error(libc::EXDEV);
        let msg = describe("rename", Path::new("a"), &e);
        assert!(msg.contains("cross-filesystem"));
        assert!(msg.ends_with(&format!("[os code: {}]", libc::EXDEV)));
    }
}
