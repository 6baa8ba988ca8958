//! Typed error definitions for fm_io.
//! Every operation reports through `OpError`; recursive operations branch on
//! `OpError::kind()` instead of comparing raw OS codes.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::fs_ops::helpers::describe;

/// Synthetic code: operation cancelled by the user.
pub const CODE_CANCELLED: i32 = -1;
/// Synthetic code: destination lies inside the source subtree.
pub const CODE_SELF_CONTAINMENT: i32 = -2;
/// Synthetic code: append-to-files requested against a directory.
pub const CODE_INVALID_COMBINATION: i32 = -3;
/// Synthetic code: copy source is a directory.
pub const CODE_SOURCE_IS_DIRECTORY: i32 = -4;
/// Synthetic code: destination exists and the policy forbids overwriting.
pub const CODE_DESTINATION_EXISTS: i32 = -5;
/// Synthetic code: a write transferred fewer bytes than requested.
pub const CODE_SHORT_WRITE: i32 = -6;
/// Synthetic code: external helper process failed.
pub const CODE_HELPER_FAILED: i32 = -7;
/// Fallback for OS errors without a raw code.
pub const CODE_UNKNOWN: i32 = -100;

/// Classified failure family, independent of the platform that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    AlreadyExists,
    NotEmpty,
    IsDirectory,
    CrossDevice,
    SelfContainment,
    InvalidCombination,
    Cancelled,
    Io,
}

impl fmt::Display for FsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsErrorKind::AlreadyExists => "already_exists",
            FsErrorKind::NotEmpty => "not_empty",
            FsErrorKind::IsDirectory => "is_directory",
            FsErrorKind::CrossDevice => "cross_device",
            FsErrorKind::SelfContainment => "self_containment",
            FsErrorKind::InvalidCombination => "invalid_combination",
            FsErrorKind::Cancelled => "cancelled",
            FsErrorKind::Io => "io",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum OpError {
    /// Failure reported by the operating system.
    #[error("{}", describe(.op, .path, .source))]
    Os {
        op: &'static str,
        path: PathBuf,
        kind: FsErrorKind,
        #[source]
        source: io::Error,
    },

    #[error("Destination '{dst}' is inside source '{src}'")]
    SelfContainment { src: PathBuf, dst: PathBuf },

    #[error("Appending requires two existing files: '{src}' -> '{dst}'")]
    InvalidCombination { src: PathBuf, dst: PathBuf },

    #[error("Source is a directory: {0}")]
    SourceIsDirectory(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("Short write to '{path}': {written} of {expected} bytes")]
    ShortWrite {
        path: PathBuf,
        written: usize,
        expected: usize,
    },

    #[error("Symlink helper '{helper}' failed with {status}")]
    HelperFailed { helper: PathBuf, status: String },

    #[error("Operation cancelled by user")]
    Cancelled,
}

impl OpError {
    /// Wrap an OS error, classifying it through the platform layer.
    pub fn os(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        OpError::Os {
            op,
            path: path.into(),
            kind: crate::platform::classify(&source),
            source,
        }
    }

    /// Adapter for `.map_err(...)` on `io::Result` values.
    pub fn with_path<'a>(
        op: &'static str,
        path: &'a std::path::Path,
    ) -> impl FnOnce(io::Error) -> OpError + 'a {
        move |e| OpError::os(op, path, e)
    }

    pub fn kind(&self) -> FsErrorKind {
        match self {
            OpError::Os { kind, .. } => *kind,
            OpError::SelfContainment { .. } => FsErrorKind::SelfContainment,
            OpError::InvalidCombination { .. } => FsErrorKind::InvalidCombination,
            OpError::SourceIsDirectory(_) => FsErrorKind::IsDirectory,
            OpError::DestinationExists(_) => FsErrorKind::AlreadyExists,
            OpError::ShortWrite { .. } | OpError::HelperFailed { .. } => FsErrorKind::Io,
            OpError::Cancelled => FsErrorKind::Cancelled,
        }
    }

    /// Numeric code for hosts: the raw OS code when available, otherwise a
    /// negative synthetic code.
    pub fn code(&self) -> i32 {
        match self {
            OpError::Os { source, .. } => source.raw_os_error().unwrap_or(CODE_UNKNOWN),
            OpError::SelfContainment { .. } => CODE_SELF_CONTAINMENT,
            OpError::InvalidCombination { .. } => CODE_INVALID_COMBINATION,
            OpError::SourceIsDirectory(_) => CODE_SOURCE_IS_DIRECTORY,
            OpError::DestinationExists(_) => CODE_DESTINATION_EXISTS,
            OpError::ShortWrite { .. } => CODE_SHORT_WRITE,
            OpError::HelperFailed { .. } => CODE_HELPER_FAILED,
            OpError::Cancelled => CODE_CANCELLED,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OpError::Cancelled)
    }
}

pub type OpResult<T = ()> = Result<T, OpError>;

/// Tri-state result of a public entry point.
#[derive(Debug)]
pub enum Outcome {
    Done,
    Failed(OpError),
    Cancelled,
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl From<OpResult> for Outcome {
    fn from(r: OpResult) -> Self {
        match r {
            Ok(()) => Outcome::Done,
            Err(OpError::Cancelled) => Outcome::Cancelled,
            Err(e) => Outcome::Failed(e),
        }
    }
}
