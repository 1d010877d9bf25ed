//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use vicinity_cli::CliError;

fn main() {
    vicinity_cli::init_logging();
    match vicinity_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("vicinity: {err}");
            std::process::exit(1);
        }
    }
}
