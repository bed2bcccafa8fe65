//! Command-line entry point for `dtmerge`.

use std::sync::Arc;

use anyhow::Result;
use clap::{CommandFactory as _, Parser as _};

use dtmerge::cli::Cli;
use dtmerge::commands;
use dtmerge::logging::{self, Log, Logger};

const COMMAND: &str = "merge";

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    if let Err(e) = args.target_platform().and_then(|_| args.destination()) {
        Cli::command()
            .error(clap::error::ErrorKind::MissingRequiredArgument, e)
            .exit();
    }

    logging::init_subscriber(args.verbose, COMMAND);
    let log = Arc::new(Logger::new(COMMAND));

    let result = commands::merge::run(&args, Arc::clone(&log) as Arc<dyn Log>);
    log.print_summary();
    result
}
