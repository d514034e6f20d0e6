mod pair;
mod prepare;

/// Subcommands for corpuschipper-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Compile a corpus tree into size-bounded train/val splits.
    Prepare(prepare::PrepareArgs),

    /// Compile a fixed train/val file pair.
    Pair(pair::PairArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Prepare(cmd) => cmd.run(),
            Commands::Pair(cmd) => cmd.run(),
        }
    }
}
