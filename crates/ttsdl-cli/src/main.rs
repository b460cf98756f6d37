use ttsdl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse_args();

    // Fall back to stderr when the state dir is not writable.
    if logging::init_logging(cli.debug).is_err() {
        logging::init_logging_stderr(cli.debug);
    }

    if let Err(err) = cli.run() {
        eprintln!("ttsdl error: {:#}", err);
        std::process::exit(1);
    }
}
