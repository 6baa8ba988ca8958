//! Recursive copy, and the per-entry visitor shared with the move fallback.

use std::path::Path;
use tracing::{debug, info};

use super::create::create_directory;
use super::io_copy::copy_file;
use super::metadata::{TEMP_DIR_MODE, copy_permissions};
use super::paths::{is_in_subtree, relocate};
use super::request::{ConflictPolicy, OpContext};
use super::traverse::{VisitAction, VisitResult, Visitor, traverse};
use super::tree_move::move_tree;
use super::tree_remove::remove_tree;
use crate::errors::{OpError, OpResult};

/// What happens to each leaf of the source tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Transfer {
    Copy,
    Move,
}

/// Rebuilds the source tree under `dst_root`: directories are created on
/// enter and get the source's permissions on leave, leaves are copied or
/// moved one by one.
pub(super) struct TransferVisitor<'a> {
    pub src_root: &'a Path,
    pub dst_root: &'a Path,
    pub policy: ConflictPolicy,
    pub transfer: Transfer,
    pub ctx: OpContext<'a>,
}

impl Visitor for TransferVisitor<'_> {
    fn visit(&mut self, path: &Path, action: VisitAction) -> VisitResult {
        if self.ctx.cancel_requested() {
            return VisitResult::Cancelled;
        }
        let dst = relocate(path, self.src_root, self.dst_root);

        match action {
            VisitAction::EnterDirectory => {
                if self.policy == ConflictPolicy::ReplaceFiles && dst.is_dir() {
                    // Merge into the existing directory and leave its mode alone.
                    return VisitResult::SkipDirectoryLeave;
                }
                create_directory(&dst, false, TEMP_DIR_MODE).into()
            }
            VisitAction::VisitFile => match self.transfer {
                Transfer::Copy => copy_file(path, &dst, self.policy, self.ctx).into(),
                Transfer::Move => move_tree(path, &dst, self.policy, self.ctx).into(),
            },
            VisitAction::LeaveDirectory => copy_permissions(path, &dst).into(),
        }
    }
}

/// Copy `src` (file, symlink-as-file, or directory tree) to `dst`.
///
/// `dst` must not lie inside `src`. With `ReplaceAll` the destination is
/// removed first; with `ReplaceFiles` existing directories are merged into.
pub fn copy_tree(src: &Path, dst: &Path, policy: ConflictPolicy, ctx: OpContext<'_>) -> OpResult {
    if is_in_subtree(dst, src) {
        return Err(OpError::SelfContainment {
            src: src.to_path_buf(),
            dst: dst.to_path_buf(),
        });
    }
    debug!(src = %src.display(), dst = %dst.display(), %policy, "copy tree");

    if policy == ConflictPolicy::ReplaceAll {
        // Clearing an ancestor of the source would destroy the source too.
        if is_in_subtree(src, dst) {
            return Err(OpError::SelfContainment {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }
        remove_tree(dst, ctx)?;
    }

    let _scope = ctx.scope();
    let mut visitor = TransferVisitor {
        src_root: src,
        dst_root: dst,
        policy,
        transfer: Transfer::Copy,
        ctx,
    };
    traverse(src, &mut visitor).into_result()?;
    info!(src = %src.display(), dst = %dst.display(), "copied tree");
    Ok(())
}
