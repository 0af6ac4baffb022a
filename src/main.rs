//! guessmap CLI entry point
//!
//! Posts one geography guessing poll and exits

use guessmap::{cli, Error};

fn main() {
    if let Err(e) = cli::run() {
        tracing::error!("{}", e);
        let code = match e {
            Error::InvalidArgument(_) => 2,
            _ => 1,
        };
        std::process::exit(code);
    }
}
