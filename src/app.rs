//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the Ctrl-C handler,
//! runs one engine request and reports its outcome.

use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use fm_io::cli::{Args, Command};
use fm_io::config::{CONFIG_ENV, config_path, load_config};
use fm_io::output as out;
use fm_io::{CancellationToken, Config, Estimator, OpContext, Outcome, Request, Totals};

use crate::logging::init_tracing;

/// Exit status for an operation stopped by the user (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;
/// Exit status for a missing command.
const EXIT_USAGE: u8 = 2;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    // Handle --print-config before logging init
    if args.print_config {
        print_config_location();
        return Ok(ExitCode::SUCCESS);
    }

    let mut cfg = match config_path() {
        Some(p) => load_config(&p)?,
        None => Config::default(),
    };
    args.apply_overrides(&mut cfg);

    // Held until the end of run so the file appender flushes.
    let _guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json)
        .context("failed to initialize logging")?;

    let Some(command) = args.command.as_ref() else {
        out::print_error("no command given; see --help");
        return Ok(ExitCode::from(EXIT_USAGE));
    };
    debug!(?cfg, ?command, "starting fm_io");

    let token = CancellationToken::new();
    if cfg.cancellable {
        let handler_token = token.clone();
        ctrlc::set_handler(move || {
            handler_token.request();
            out::print_warn("Received interrupt; stopping after the current step...");
        })
        .context("failed to install signal handler")?;
    }

    let request = command.to_request(&cfg);
    let estimator = Estimator::new(estimate(&request));
    let mut ctx = OpContext::new().with_progress(&estimator);
    if cfg.cancellable {
        ctx = ctx.cancellable(&token);
    }

    let name = request.name();
    match Outcome::from(request.execute(ctx)) {
        Outcome::Done => {
            let done = estimator.done();
            info!(op = name, bytes = done.bytes, items = done.items, "operation completed");
            if is_tree_op(command) {
                out::print_success(&format!("{name}: {}", out::format_totals(done)));
            } else {
                out::print_success(name);
            }
            Ok(ExitCode::SUCCESS)
        }
        Outcome::Cancelled => {
            let done = estimator.done();
            warn!(op = name, ratio = estimator.ratio(), "operation stopped by user");
            out::print_warn(&format!(
                "{name} stopped: {} of {} processed",
                out::format_totals(done),
                out::format_totals(estimator.total())
            ));
            Ok(ExitCode::from(EXIT_CANCELLED))
        }
        Outcome::Failed(e) => {
            error!(code = e.code(), kind = %e.kind(), error = %e, op = name, "operation failed");
            out::print_error(&e.to_string());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_config_location() {
    if let Some(cfg_env) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        out::print_info(&format!(
            "Using {CONFIG_ENV} (explicit):\n  {}",
            Path::new(&cfg_env).display()
        ));
        return;
    }
    match config_path() {
        Some(p) => {
            out::print_info(&format!("Default fm_io config path:\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there yet; defaults are used.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn is_tree_op(command: &Command) -> bool {
    matches!(
        command,
        Command::Rm { recursive: true, .. } | Command::Cp { .. } | Command::Mv { .. }
    )
}

/// Pre-scan what the request will touch so progress has a denominator.
fn estimate(request: &Request) -> Totals {
    match request {
        Request::CopyFile { source, .. }
        | Request::CopyTree { source, .. }
        | Request::MoveTree { source, .. } => Totals::scan(source),
        Request::RemoveTree { path } => Totals::scan(path),
        _ => Totals::default(),
    }
}
