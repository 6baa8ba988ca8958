//! Filesystem operations: primitives, traversal, and recursive tree operations.

mod create;
pub(crate) mod helpers;
mod io_copy;
mod metadata;
mod paths;
mod remove;
mod request;
mod symlink;
mod traverse;
mod tree_copy;
mod tree_move;
mod tree_remove;

pub use create::{create_directory, create_file};
pub use io_copy::{BLOCK_SIZE, copy_file};
pub use metadata::{TEMP_DIR_MODE, copy_permissions};
pub use paths::{is_case_change, is_in_subtree};
pub use remove::{remove_directory, remove_file};
pub use request::{ConflictPolicy, OpContext, Request};
pub use symlink::create_symlink;
pub use traverse::{VisitAction, VisitResult, Visitor, traverse};
pub use tree_copy::copy_tree;
pub use tree_move::move_tree;
pub use tree_remove::remove_tree;
