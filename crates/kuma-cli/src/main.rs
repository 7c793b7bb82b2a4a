mod cli;
mod lines_cmd;
mod logging;
mod run_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    tracing::debug!(command = ?cli.command, "starting");

    let result = match cli.command {
        cli::Commands::Run(args) => run_cmd::run(args),
        cli::Commands::Lines {
            source,
            ref file,
            records,
            ref config,
        } => lines_cmd::run(source.into(), file, records, config.as_deref()),
    };

    if let Err(code) = result {
        std::process::exit(code);
    }
}
