use anyhow::Result;
use clap::Parser;
use spendbook::cli::Cli;
use tracing_subscriber::filter::LevelFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run()
}

/// Diagnostics go to stderr so stdout stays clean for reports and exports.
fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
