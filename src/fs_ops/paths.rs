//! Path relations used by the tree operations.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `p` to an absolute, symlink-free form. A path that does not exist
/// yet resolves through its parent.
fn resolve(p: &Path) -> Option<PathBuf> {
    if let Ok(c) = dunce::canonicalize(p) {
        return Some(c);
    }
    let name = p.file_name()?;
    let parent = match p.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    dunce::canonicalize(parent).ok().map(|c| c.join(name))
}

/// True if `path` is `root` or lies beneath it.
pub fn is_in_subtree(path: &Path, root: &Path) -> bool {
    match (resolve(path), resolve(root)) {
        (Some(p), Some(r)) => p.starts_with(&r),
        _ => path.starts_with(root),
    }
}

/// True if `src` and `dst` name the same entry and differ only in case, which
/// a case-insensitive filesystem reports as "already exists".
pub fn is_case_change(src: &Path, dst: &Path) -> bool {
    let (Some(a), Some(b)) = (src.file_name(), dst.file_name()) else {
        return false;
    };
    a != b && eq_ignore_case(a, b) && same_parent(src, dst) && same_entry(src, dst)
}

/// Two distinct entries that only differ in case can coexist on a
/// case-sensitive filesystem; renaming one onto the other is not a case change.
fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(x), Ok(y)) => same_identity(&x, &y),
        _ => true,
    }
}

#[cfg(unix)]
fn same_identity(a: &fs::Metadata, b: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_identity(_a: &fs::Metadata, _b: &fs::Metadata) -> bool {
    true
}

fn eq_ignore_case(a: &OsStr, b: &OsStr) -> bool {
    a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
}

fn same_parent(a: &Path, b: &Path) -> bool {
    match (a.parent().and_then(resolve), b.parent().and_then(resolve)) {
        (Some(x), Some(y)) => x == y,
        _ => a.parent() == b.parent(),
    }
}

/// Map `path`, which lies under `from`, to the same relative spot under `to`.
pub fn relocate(path: &Path, from: &Path, to: &Path) -> PathBuf {
    match path.strip_prefix(from) {
        Ok(rel) if rel.as_os_str().is_empty() => to.to_path_buf(),
        Ok(rel) => to.join(rel),
        Err(_) => to.to_path_buf(),
    }
}
