//! Operation requests.
//!
//! `Request` bundles the arguments of one operation. Each variant carries
//! exactly the fields its operation reads; cancellation and progress travel
//! separately in `OpContext` because every operation shares them.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cancel::{CancelScope, CancellationToken};
use crate::errors::OpResult;
use crate::progress::ProgressSink;

use super::{
    copy_file, copy_tree, create_directory, create_file, create_symlink, move_tree,
    remove_directory, remove_file, remove_tree,
};

/// What to do when a destination already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Abort if the destination exists.
    #[default]
    Fail,
    /// Delete the whole destination first.
    ReplaceAll,
    /// Overwrite individual files, merge directories.
    ReplaceFiles,
    /// Only meaningful between two existing regular files.
    AppendToFiles,
}

impl ConflictPolicy {
    /// Whether an existing destination may be removed or replaced.
    #[inline]
    pub fn overwrites(self) -> bool {
        self != ConflictPolicy::Fail
    }

    /// Parse common names (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fail" | "none" | "skip" => Some(ConflictPolicy::Fail),
            "replace_all" | "replace" => Some(ConflictPolicy::ReplaceAll),
            "replace_files" | "merge" => Some(ConflictPolicy::ReplaceFiles),
            "append_to_files" | "append" => Some(ConflictPolicy::AppendToFiles),
            _ => None,
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConflictPolicy::Fail => "fail",
            ConflictPolicy::ReplaceAll => "replace_all",
            ConflictPolicy::ReplaceFiles => "replace_files",
            ConflictPolicy::AppendToFiles => "append_to_files",
        };
        f.write_str(s)
    }
}

impl FromStr for ConflictPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid conflict policy: '{s}'"))
    }
}

/// Per-call handles shared by every operation: the cancellation token (when
/// the operation is cancellable) and the progress tracker (when reported).
#[derive(Clone, Copy, Default)]
pub struct OpContext<'a> {
    pub cancel: Option<&'a CancellationToken>,
    pub progress: Option<&'a dyn ProgressSink>,
}

impl<'a> OpContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancellable(mut self, token: &'a CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn with_progress(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    #[inline]
    pub fn is_cancellable(&self) -> bool {
        self.cancel.is_some()
    }

    /// Open a cancellable section when the operation is cancellable.
    pub(crate) fn scope(&self) -> Option<CancelScope<'a>> {
        self.cancel.map(CancellationToken::enable)
    }

    #[inline]
    pub(crate) fn cancel_requested(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_requested)
    }

    pub(crate) fn report(&self, bytes: u64, items: u64) {
        if let Some(p) = self.progress {
            p.update(bytes, items);
        }
    }

    /// Run `f` with progress reporting silenced, restoring the previous state.
    pub(crate) fn silenced<T>(&self, f: impl FnOnce() -> T) -> T {
        match self.progress {
            Some(p) => {
                let prev = p.silence();
                let out = f();
                p.set_silenced(prev);
                out
            }
            None => f(),
        }
    }
}

impl fmt::Debug for OpContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpContext")
            .field("cancellable", &self.is_cancellable())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// One filesystem operation and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateFile {
        path: PathBuf,
    },
    CreateDirectory {
        path: PathBuf,
        create_parents: bool,
        mode: u32,
    },
    RemoveFile {
        path: PathBuf,
    },
    RemoveDirectory {
        path: PathBuf,
    },
    CopyFile {
        source: PathBuf,
        destination: PathBuf,
        policy: ConflictPolicy,
    },
    CreateSymlink {
        target: PathBuf,
        link: PathBuf,
        policy: ConflictPolicy,
    },
    RemoveTree {
        path: PathBuf,
    },
    CopyTree {
        source: PathBuf,
        destination: PathBuf,
        policy: ConflictPolicy,
    },
    MoveTree {
        source: PathBuf,
        destination: PathBuf,
        policy: ConflictPolicy,
    },
}

impl Request {
    /// Short operation name for logs and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Request::CreateFile { .. } => "create file",
            Request::CreateDirectory { .. } => "create directory",
            Request::RemoveFile { .. } => "remove file",
            Request::RemoveDirectory { .. } => "remove directory",
            Request::CopyFile { .. } => "copy file",
            Request::CreateSymlink { .. } => "create symlink",
            Request::RemoveTree { .. } => "remove tree",
            Request::CopyTree { .. } => "copy tree",
            Request::MoveTree { .. } => "move tree",
        }
    }

    pub fn execute(&self, ctx: OpContext<'_>) -> OpResult {
        match self {
            Request::CreateFile { path } => create_file(path),
            Request::CreateDirectory {
                path,
                create_parents,
                mode,
            } => create_directory(path, *create_parents, *mode),
            Request::RemoveFile { path } => remove_file(path),
            Request::RemoveDirectory { path } => remove_directory(path),
            Request::CopyFile {
                source,
                destination,
                policy,
            } => copy_file(source, destination, *policy, ctx),
            Request::CreateSymlink {
                target,
                link,
                policy,
            } => create_symlink(target, link, *policy),
            Request::RemoveTree { path } => remove_tree(path, ctx),
            Request::CopyTree {
                source,
                destination,
                policy,
            } => copy_tree(source, destination, *policy, ctx),
            Request::MoveTree {
                source,
                destination,
                policy,
            } => move_tree(source, destination, *policy, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Outcome;
    use tempfile::tempdir;

    #[test]
    fn policy_parse_and_display_agree() {
        for p in [
            ConflictPolicy::Fail,
            ConflictPolicy::ReplaceAll,
            ConflictPolicy::ReplaceFiles,
            ConflictPolicy::AppendToFiles,
        ] {
            assert_eq!(p.to_string().parse::<ConflictPolicy>(), Ok(p));
        }
        assert_eq!(ConflictPolicy::parse("Replace-Files"), Some(ConflictPolicy::ReplaceFiles));
        assert!("bogus".parse::<ConflictPolicy>().is_err());
        assert!(!ConflictPolicy::Fail.overwrites());
    }

    #[test]
    fn execute_dispatches_to_operation() {
        let td = tempdir().unwrap();
        let dir = td.path().join("a/b");
        let req = Request::CreateDirectory {
            path: dir.clone(),
            create_parents: true,
            mode: 0o755,
        };
        assert!(Outcome::from(req.execute(OpContext::new())).is_done());
        assert!(dir.is_dir());

        let rm = Request::RemoveTree {
            path: td.path().join("a"),
        };
        assert_eq!(rm.name(), "remove tree");
        rm.execute(OpContext::new()).unwrap();
        assert!(!td.path().join("a").exists());
    }

    #[test]
    fn context_scope_follows_cancellable_flag() {
        let token = CancellationToken::new();
        token.request();
        let plain = OpContext::new();
        assert!(plain.scope().is_none());
        assert!(!plain.cancel_requested());

        let ctx = OpContext::new().cancellable(&token);
        let _scope = ctx.scope();
        assert!(ctx.cancel_requested());
    }
}
