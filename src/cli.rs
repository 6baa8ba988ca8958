//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - Global flags may appear before or after the command.
//! - --debug is a shorthand for --log-level debug.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, parse_mode};
use crate::fs_ops::{ConflictPolicy, Request};

/// File operations with conflict policies and Ctrl-C cancellation.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Cancellable file and directory operations")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// What to do when a destination exists.
    #[arg(
        long,
        global = true,
        value_name = "POLICY",
        help = "Conflict policy: fail, replace_all, replace_files, append_to_files"
    )]
    pub policy: Option<ConflictPolicy>,

    /// Ignore Ctrl-C instead of stopping the operation.
    #[arg(long, global = true, help = "Do not allow Ctrl-C to stop the operation")]
    pub no_cancel: bool,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        global = true,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Print where fm_io will look for the config file, then exit.
    #[arg(long, help = "Print the config file location used by fm_io and exit")]
    pub print_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an empty file (fails if it exists).
    Touch {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Create a directory.
    Mkdir {
        /// Create missing parent directories.
        #[arg(short = 'p', long)]
        parents: bool,
        /// Octal permission bits (default from config).
        #[arg(long, value_parser = parse_mode_arg)]
        mode: Option<u32>,
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// Remove a file, or a whole tree with -r.
    Rm {
        #[arg(short = 'r', long)]
        recursive: bool,
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,
    },
    /// Remove an empty directory.
    Rmdir {
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    /// Copy a file, or a whole tree with -r.
    Cp {
        #[arg(short = 'r', long)]
        recursive: bool,
        #[arg(value_hint = ValueHint::AnyPath)]
        source: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        destination: PathBuf,
    },
    /// Move a file or tree.
    Mv {
        #[arg(value_hint = ValueHint::AnyPath)]
        source: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        destination: PathBuf,
    },
    /// Create a symbolic link at LINK pointing to TARGET.
    Ln {
        target: PathBuf,
        #[arg(value_hint = ValueHint::AnyPath)]
        link: PathBuf,
    },
}

fn parse_mode_arg(s: &str) -> Result<u32, String> {
    parse_mode(s).ok_or_else(|| format!("invalid octal mode: '{s}'"))
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(p) = &self.log_file {
            cfg.log_file = Some(p.clone());
        }
        if let Some(policy) = self.policy {
            cfg.conflict_policy = policy;
        }
        if self.no_cancel {
            cfg.cancellable = false;
        }
    }
}

impl Command {
    /// Translate the command into an engine request under `cfg`.
    pub fn to_request(&self, cfg: &Config) -> Request {
        let policy = cfg.conflict_policy;
        match self.clone() {
            Command::Touch { path } => Request::CreateFile { path },
            Command::Mkdir {
                parents,
                mode,
                path,
            } => Request::CreateDirectory {
                path,
                create_parents: parents,
                mode: mode.unwrap_or(cfg.dir_mode),
            },
            Command::Rm {
                recursive: true,
                path,
            } => Request::RemoveTree { path },
            Command::Rm { path, .. } => Request::RemoveFile { path },
            Command::Rmdir { path } => Request::RemoveDirectory { path },
            Command::Cp {
                recursive: true,
                source,
                destination,
            } => Request::CopyTree {
                source,
                destination,
                policy,
            },
            Command::Cp {
                source,
                destination,
                ..
            } => Request::CopyFile {
                source,
                destination,
                policy,
            },
            Command::Mv {
                source,
                destination,
            } => Request::MoveTree {
                source,
                destination,
                policy,
            },
            Command::Ln { target, link } => Request::CreateSymlink {
                target,
                link,
                policy,
            },
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
