#![deny(warnings)]

mod cli;
mod session;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run_cli() {
        Ok(cli::CliOutcome::Handled) => ExitCode::SUCCESS,
        Ok(cli::CliOutcome::Session(options)) => match session::run_interactive(&options) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("{err}");
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
