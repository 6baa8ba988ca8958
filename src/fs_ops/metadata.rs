//! Permission fix-up for copied directories.
//! - Directories are created with a temporary owner-only mode so children can
//!   be written; once drained, the source's permission bits are applied.
//! - Timestamps and ownership are not carried over.

use std::fs;
use std::path::Path;
use tracing::trace;

use crate::errors::{OpError, OpResult};
use crate::platform;

/// Mode given to destination directories while they are being populated.
pub const TEMP_DIR_MODE: u32 = 0o700;

/// Apply the permission bits of `src` to `dest`. On Unix this includes the
/// setuid/setgid/sticky bits; on Windows only the read-only attribute.
pub fn copy_permissions(src: &Path, dest: &Path) -> OpResult {
    let meta = fs::metadata(src).map_err(OpError::with_path("read permissions", src))?;
    let mode = platform::mode_of(&meta);
    platform::set_mode(dest, mode).map_err(OpError::with_path("set permissions", dest))?;
    trace!(path = %dest.display(), mode = format!("{:o}", mode), "applied source permissions");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::tempdir;

    #[test]
    fn source_mode_replaces_temporary_mode() {
        let td = tempdir().unwrap();
        let src = td.path().join("src");
        let dst = td.path().join("dst");
        fs::create_dir(&src).unwrap();
        platform::create_dir(&dst, TEMP_DIR_MODE).unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o705)).unwrap();

        copy_permissions(&src, &dst).unwrap();
        let mode = fs::metadata(&dst).unwrap().permissions().mode() & 0o7777;
        assert_eq!(mode, 0o705);
    }

    #[test]
    fn missing_source_is_an_error() {
        let td = tempdir().unwrap();
        assert!(copy_permissions(&td.path().join("gone"), td.path()).is_err());
    }
}
