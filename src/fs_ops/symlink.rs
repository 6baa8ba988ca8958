//! Symbolic link creation.

use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
#[cfg(not(unix))]
use tracing::warn;

use super::request::ConflictPolicy;
use crate::errors::{OpError, OpResult};
use crate::platform;

/// Create `link` pointing at `target`. The target need not exist.
///
/// Where links are native, an existing *symlink* at `link` is replaced when
/// `policy` allows overwriting; any other existing entry is an error. Where
/// they are not, the policy is ignored and a helper executable is tried
/// after the native call fails.
pub fn create_symlink(target: &Path, link: &Path, policy: ConflictPolicy) -> OpResult {
    if platform::HAS_NATIVE_SYMLINKS {
        native(target, link, policy)
    } else {
        with_helper(target, link)
    }
}

fn native(target: &Path, link: &Path, policy: ConflictPolicy) -> OpResult {
    match platform::symlink(target, link) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists && policy.overwrites() && is_symlink(link) => {
            fs::remove_file(link).map_err(OpError::with_path("remove link", link))?;
            platform::symlink(target, link).map_err(OpError::with_path("create symlink", link))?;
        }
        Err(e) => return Err(OpError::os("create symlink", link, e)),
    }
    debug!(target = %target.display(), link = %link.display(), "created symlink");
    Ok(())
}

#[cfg(not(unix))]
fn with_helper(target: &Path, link: &Path) -> OpResult {
    match platform::symlink(target, link) {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(error = %e, link = %link.display(), "native symlink failed; trying helper");
            platform::run_symlink_helper(target, link)
        }
    }
}

#[cfg(unix)]
fn with_helper(target: &Path, link: &Path) -> OpResult {
    platform::symlink(target, link).map_err(OpError::with_path("create symlink", link))
}

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink())
}
