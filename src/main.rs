use std::process::ExitCode;

use fm_io::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = fm_io::cli::parse();
    match app::run(args) {
        Ok(code) => code,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
