//! The `kontor` binary is intentionally thin: argument parsing, dispatch,
//! and rendering live in `src/cli/`; this file only wires them up and
//! handles process termination.

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", console::style("error:").red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
