use clap::Parser;
use sortdrop::cli::{Cli, RunOptions, run_cli};
use sortdrop::logging::init_logger;
use sortdrop::output::OutputFormatter;
use std::process;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let options = RunOptions::from(cli);

    // Per-file failures are reported as they happen and do not change the
    // exit status; only fatal errors do.
    if let Err(e) = run_cli(&options) {
        OutputFormatter::error(&e.to_string());
        process::exit(1);
    }
}
