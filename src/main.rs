use clap::Parser;
use marketscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    marketscan::logging::init(cli.verbose);
    run(cli)
}
