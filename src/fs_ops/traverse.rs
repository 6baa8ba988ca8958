//! Depth-first subtree walk.
//!
//! `traverse` emits `EnterDirectory` before a directory's children and
//! `LeaveDirectory` after all of them; every non-directory entry (symlinks
//! included, never followed) gets exactly one `VisitFile`. Sibling order is
//! whatever the directory listing yields.

use std::fs;
use std::path::Path;
use tracing::trace;

use crate::errors::OpError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitAction {
    EnterDirectory,
    VisitFile,
    LeaveDirectory,
}

#[derive(Debug)]
pub enum VisitResult {
    Continue,
    /// Abort the whole walk with this failure.
    Error(OpError),
    /// Abort the whole walk on user request.
    Cancelled,
    /// From `EnterDirectory`: walk the children but emit no `LeaveDirectory`.
    SkipDirectoryLeave,
}

impl VisitResult {
    /// Fold into a `Result`; `Continue` and `SkipDirectoryLeave` are success.
    pub fn into_result(self) -> Result<(), OpError> {
        match self {
            VisitResult::Continue | VisitResult::SkipDirectoryLeave => Ok(()),
            VisitResult::Error(e) => Err(e),
            VisitResult::Cancelled => Err(OpError::Cancelled),
        }
    }
}

impl From<Result<(), OpError>> for VisitResult {
    fn from(r: Result<(), OpError>) -> Self {
        match r {
            Ok(()) => VisitResult::Continue,
            Err(OpError::Cancelled) => VisitResult::Cancelled,
            Err(e) => VisitResult::Error(e),
        }
    }
}

/// Per-node callback driven by `traverse`.
pub trait Visitor {
    fn visit(&mut self, path: &Path, action: VisitAction) -> VisitResult;
}

impl<F> Visitor for F
where
    F: FnMut(&Path, VisitAction) -> VisitResult,
{
    fn visit(&mut self, path: &Path, action: VisitAction) -> VisitResult {
        self(path, action)
    }
}

/// Walk `root`, feeding each node to `visitor`. Returns the first result
/// that stops the walk (`Error` or `Cancelled`), otherwise `Continue`.
pub fn traverse<V: Visitor + ?Sized>(root: &Path, visitor: &mut V) -> VisitResult {
    let meta = match fs::symlink_metadata(root) {
        Ok(m) => m,
        Err(e) => return VisitResult::Error(OpError::os("stat", root, e)),
    };
    if !meta.is_dir() {
        return visitor.visit(root, VisitAction::VisitFile);
    }
    walk_dir(root, visitor)
}

fn walk_dir<V: Visitor + ?Sized>(dir: &Path, visitor: &mut V) -> VisitResult {
    let skip_leave = match visitor.visit(dir, VisitAction::EnterDirectory) {
        VisitResult::Continue => false,
        VisitResult::SkipDirectoryLeave => true,
        stop => return stop,
    };

    // Collect first so visitors may modify the directory while we walk it.
    let entries = match fs::read_dir(dir).and_then(|rd| rd.collect::<Result<Vec<_>, _>>()) {
        Ok(v) => v,
        Err(e) => return VisitResult::Error(OpError::os("list directory", dir, e)),
    };
    trace!(dir = %dir.display(), entries = entries.len(), "walking directory");

    for entry in entries {
        let path = entry.path();
        let is_dir = match entry.file_type() {
            Ok(t) => t.is_dir(),
            Err(e) => return VisitResult::Error(OpError::os("stat", &path, e)),
        };
        let res = if is_dir {
            walk_dir(&path, visitor)
        } else {
            visitor.visit(&path, VisitAction::VisitFile)
        };
        match res {
            VisitResult::Continue | VisitResult::SkipDirectoryLeave => {}
            stop => return stop,
        }
    }

    if skip_leave {
        return VisitResult::Continue;
    }
    visitor.visit(dir, VisitAction::LeaveDirectory)
}
