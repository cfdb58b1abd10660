//! memorability binary
//!
//! Argument parsing, command dispatch and response output all live in the
//! `cli` module. Failures are printed to stderr with their code and the
//! process exits non-zero.

use memorability::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
