mod commands;
mod logging;
mod tokenizer_select;

use clap::Parser;
use commands::Commands;

/// corpuschipper-cli
#[derive(clap::Parser, Debug)]
pub struct Args {
    /// Subcommand to run.
    #[clap(subcommand)]
    pub command: Commands,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    args.command.run()
}
