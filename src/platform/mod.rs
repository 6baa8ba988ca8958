//! Platform-specific helpers.
//! This module hides OS differences (Unix/Windows) behind a uniform API so
//! the rest of the codebase can remain platform-agnostic: native error codes
//! are classified into `FsErrorKind`, and rename/mkdir/chmod/symlink go
//! through here.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{
    HAS_ATOMIC_FILE_REPLACE, HAS_NATIVE_SYMLINKS, classify, create_dir, mode_of,
    open_log_file_secure_append, set_mode, symlink,
};

#[cfg(not(unix))]
pub use windows::{
    HAS_ATOMIC_FILE_REPLACE, HAS_NATIVE_SYMLINKS, classify, create_dir, mode_of,
    open_log_file_secure_append, run_symlink_helper, set_mode, symlink, symlink_helper_path,
};

use std::io;
use std::path::Path;

#[cfg(test)]
thread_local! {
    static FORCE_CROSS_DEVICE: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

/// Test-only: make `rename` on the current thread fail as if `src` and `dst`
/// lived on different filesystems.
#[cfg(test)]
pub(crate) fn force_cross_device(on: bool) {
    FORCE_CROSS_DEVICE.with(|f| f.set(on));
}

/// Atomic rename within one filesystem/volume.
pub fn rename(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(test)]
    if FORCE_CROSS_DEVICE.with(|f| f.get()) {
        #[cfg(unix)]
        return Err(io::Error::from_raw_os_error(libc::EXDEV));
        #[cfg(not(unix))]
        return Err(io::Error::from_raw_os_error(
            windows_sys::Win32::Foundation::ERROR_NOT_SAME_DEVICE as i32,
        ));
    }
    std::fs::rename(src, dst)
}
