//! Core library for `fm_io`.
//!
//! The filesystem I/O engine of a file manager: primitive operations
//! (create, remove, copy, symlink), a depth-first traversal engine, and
//! recursive remove/copy/move built on top of it with conflict policies,
//! cooperative cancellation and a cross-device fallback.
//!
//! Every operation is synchronous and returns an `OpResult`; convert it to
//! an `Outcome` to tell "stopped by the user" apart from a failure.

pub mod cancel;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod output;
pub mod platform;
pub mod progress;

pub use cancel::{CancelScope, CancellationToken};
pub use config::{Config, LogLevel, config_path, path_has_symlink_ancestor};
pub use errors::{FsErrorKind, OpError, OpResult, Outcome};
pub use fs_ops::{
    ConflictPolicy, OpContext, Request, VisitAction, VisitResult, Visitor, copy_file, copy_tree,
    create_directory, create_file, create_symlink, move_tree, remove_directory, remove_file,
    remove_tree, traverse,
};
pub use progress::{Estimator, ProgressSink, Totals};
