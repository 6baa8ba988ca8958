//! Recursive removal.

use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use super::remove::{remove_directory, remove_file};
use super::request::OpContext;
use super::traverse::{VisitAction, VisitResult, Visitor, traverse};
use crate::errors::{OpError, OpResult};

struct RemoveVisitor<'a> {
    ctx: OpContext<'a>,
}

impl Visitor for RemoveVisitor<'_> {
    fn visit(&mut self, path: &Path, action: VisitAction) -> VisitResult {
        if self.ctx.cancel_requested() {
            return VisitResult::Cancelled;
        }
        let res = match action {
            // Children must be gone before their directory.
            VisitAction::EnterDirectory => return VisitResult::Continue,
            VisitAction::VisitFile => remove_file(path),
            VisitAction::LeaveDirectory => remove_directory(path),
        };
        if res.is_ok() {
            self.ctx.report(0, 1);
        }
        res.into()
    }
}

/// Remove `path` and everything beneath it. Symlinks are removed, never
/// followed. A path that does not exist is already removed.
pub fn remove_tree(path: &Path, ctx: OpContext<'_>) -> OpResult {
    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "nothing to remove");
            return Ok(());
        }
        Err(e) => return Err(OpError::os("stat", path, e)),
    }

    let _scope = ctx.scope();
    let mut visitor = RemoveVisitor { ctx };
    let res = traverse(path, &mut visitor).into_result();
    match &res {
        Ok(()) => info!(path = %path.display(), "removed tree"),
        Err(e) if e.is_cancelled() => info!(path = %path.display(), "removal cancelled"),
        Err(_) => {}
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::progress::{Estimator, ProgressSink, Totals};
    use assert_fs::prelude::*;

    #[test]
    fn removes_nested_tree_and_counts_items() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("t/a.txt").write_str("a").unwrap();
        temp.child("t/sub/b.txt").write_str("b").unwrap();
        temp.child("t/sub/deeper").create_dir_all().unwrap();
        let root = temp.path().join("t");

        let est = Estimator::new(Totals::scan(&root));
        remove_tree(&root, OpContext::new().with_progress(&est)).unwrap();

        assert!(!root.exists());
        // t, a.txt, sub, b.txt, deeper
        assert_eq!(est.done().items, 5);
        assert_eq!(est.ratio(), 1.0);
    }

    #[test]
    fn missing_path_is_success() {
        let temp = assert_fs::TempDir::new().unwrap();
        remove_tree(&temp.path().join("absent"), OpContext::new()).unwrap();
    }

    #[test]
    fn single_file_root() {
        let temp = assert_fs::TempDir::new().unwrap();
        let f = temp.child("lonely.txt");
        f.write_str("x").unwrap();
        remove_tree(f.path(), OpContext::new()).unwrap();
        assert!(!f.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_is_unlinked_not_followed() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("keep/precious.txt").write_str("p").unwrap();
        temp.child("doomed").create_dir_all().unwrap();
        std::os::unix::fs::symlink(temp.path().join("keep"), temp.path().join("doomed/link")).unwrap();

        remove_tree(&temp.path().join("doomed"), OpContext::new()).unwrap();
        assert!(!temp.path().join("doomed").exists());
        assert!(temp.path().join("keep/precious.txt").exists());
    }

    #[test]
    fn requested_cancel_stops_before_first_entry() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("t/a.txt").write_str("a").unwrap();
        let root = temp.path().join("t");

        let token = CancellationToken::new();
        token.request();
        let err = remove_tree(&root, OpContext::new().cancellable(&token)).unwrap_err();
        assert!(err.is_cancelled());
        assert!(root.join("a.txt").exists());

        // Not cancellable: the pending request is ignored.
        remove_tree(&root, OpContext::new()).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn silenced_progress_reports_nothing() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("t/a.txt").write_str("a").unwrap();
        let est = Estimator::new(Totals::default());
        let ctx = OpContext::new().with_progress(&est);
        ctx.silenced(|| remove_tree(&temp.path().join("t"), ctx)).unwrap();
        assert_eq!(est.done(), Totals::default());
        assert!(!est.silence(), "silence state restored");
    }
}
