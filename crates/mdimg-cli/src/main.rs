use mdimg_core::logging::{self, LogSink};

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible.
    let sink = logging::init();

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("mdimg error: {:#}", err);
        if let LogSink::File(path) = &sink {
            eprintln!("details in {}", path.display());
        }
        std::process::exit(1);
    }
}
