//! Recursive move: atomic rename first, then policy-driven fallbacks.
//!
//! ```text
//! rename ─ ok ───────────────────────────────▶ done
//!        ├ cross device ─▶ copy_tree, remove_tree(src)
//!        ├ exists family ─┬ ReplaceAll   ─▶ remove_tree(dst), rename again
//!        │                └ ReplaceFiles ─▶ move entry by entry, drop drained src
//!        └ other ───────────────────────────▶ error
//! ```

use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use super::paths::{is_case_change, is_in_subtree};
use super::remove::remove_file;
use super::request::{ConflictPolicy, OpContext};
use super::traverse::traverse;
use super::tree_copy::{Transfer, TransferVisitor, copy_tree};
use super::tree_remove::remove_tree;
use crate::errors::{FsErrorKind, OpError, OpResult};
use crate::platform;
use crate::progress::Totals;

/// A directory itself, not a symlink pointing at one.
fn is_real_dir(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok_and(|m| m.is_dir())
}

/// A file, a symlink, or nothing at all; anything but a real directory.
fn is_file(path: &Path) -> bool {
    !is_real_dir(path)
}

/// Move `src` to `dst`, resolving an existing destination per `policy`.
pub fn move_tree(src: &Path, dst: &Path, policy: ConflictPolicy, ctx: OpContext<'_>) -> OpResult {
    let case_change = is_case_change(src, dst);
    if policy == ConflictPolicy::Fail && dst.exists() && !case_change {
        return Err(OpError::DestinationExists(dst.to_path_buf()));
    }
    if policy == ConflictPolicy::AppendToFiles && !(is_file(src) && is_file(dst)) {
        return Err(OpError::InvalidCombination {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    if is_real_dir(src) && !case_change && is_in_subtree(dst, src) {
        return Err(OpError::SelfContainment {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    debug!(src = %src.display(), dst = %dst.display(), %policy, "move");

    // Bytes of the whole subtree, so a renamed directory counts like a copied one.
    let bytes = match ctx.progress {
        Some(_) => Totals::scan(src).bytes,
        None => 0,
    };
    let err = match platform::rename(src, dst) {
        Ok(()) => {
            ctx.report(bytes, 1);
            return Ok(());
        }
        Err(e) => OpError::os("rename", src, e),
    };

    match err.kind() {
        FsErrorKind::CrossDevice => {
            warn!(src = %src.display(), dst = %dst.display(), "rename crosses devices; copying");
            copy_tree(src, dst, policy, ctx)?;
            ctx.silenced(|| remove_tree(src, ctx))?;
            info!(src = %src.display(), dst = %dst.display(), "moved across devices");
            Ok(())
        }
        FsErrorKind::AlreadyExists | FsErrorKind::NotEmpty | FsErrorKind::IsDirectory => {
            resolve_conflict(src, dst, policy, ctx, err)
        }
        _ => Err(err),
    }
}

fn resolve_conflict(
    src: &Path,
    dst: &Path,
    policy: ConflictPolicy,
    ctx: OpContext<'_>,
    err: OpError,
) -> OpResult {
    let per_entry = policy == ConflictPolicy::ReplaceFiles
        || (policy == ConflictPolicy::AppendToFiles && !platform::HAS_ATOMIC_FILE_REPLACE);

    if policy == ConflictPolicy::ReplaceAll {
        // Clearing an ancestor of the source would destroy the source too.
        if is_in_subtree(src, dst) {
            return Err(OpError::SelfContainment {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }
        warn!(dst = %dst.display(), "replacing destination");
        remove_tree(dst, ctx)?;
        return platform::rename(src, dst).map_err(OpError::with_path("rename", src));
    }
    if !per_entry {
        return Err(err);
    }
    // A leaf cannot be merged into a directory; walking it would come back here.
    if !is_real_dir(src) && dst.is_dir() {
        return Err(err);
    }

    if !platform::HAS_ATOMIC_FILE_REPLACE && is_file(dst) && dst.exists() {
        remove_file(dst)?;
    }

    warn!(src = %src.display(), dst = %dst.display(), "merging entry by entry");
    {
        let _scope = ctx.scope();
        let mut visitor = TransferVisitor {
            src_root: src,
            dst_root: dst,
            policy,
            transfer: Transfer::Move,
            ctx,
        };
        traverse(src, &mut visitor).into_result()?;
    }
    // Leaves were relocated one by one; only emptied directories remain.
    if is_real_dir(src) {
        ctx.silenced(|| remove_tree(src, ctx))?;
    }
    info!(src = %src.display(), dst = %dst.display(), "merged into destination");
    Ok(())
}
