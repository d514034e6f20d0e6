use std::path::PathBuf;

use corpuschipper::{CompilerOptions, VocabPolicy, WalkOptions, compile_pair};

use crate::{
    logging::LogArgs,
    tokenizer_select::{Backend, TokenizerArgs},
};

/// Args for the pair command.
#[derive(clap::Args, Debug)]
pub struct PairArgs {
    /// Training source file.
    train_file: PathBuf,

    /// Validation source file.
    val_file: PathBuf,

    #[clap(flatten)]
    logging: LogArgs,

    #[command(flatten)]
    tokenizer: TokenizerArgs,

    /// Output directory for train.bin, val.bin and meta.json.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Abort on the first out-of-range token id.
    #[arg(long)]
    strict_vocab: bool,
}

impl PairArgs {
    /// Run the pair command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let options = CompilerOptions {
            out_dir: self.out_dir.clone(),
            walk: WalkOptions {
                vocab: if self.strict_vocab {
                    VocabPolicy::Fail
                } else {
                    VocabPolicy::Warn
                },
                ..WalkOptions::default()
            },
            ..CompilerOptions::default()
        };

        let report = match self.tokenizer.load()? {
            Backend::Script(tokenizer) => {
                compile_pair::<u16>(&self.train_file, &self.val_file, &tokenizer, &options)?
            }
            Backend::Subword(tokenizer) => {
                compile_pair::<u32>(&self.train_file, &self.val_file, &tokenizer, &options)?
            }
        };

        log::info!(
            "train: {} tokens; val: {} tokens; vocab_size: {}",
            report.train.tokens,
            report.val.tokens,
            report.manifest.vocab_size,
        );

        Ok(())
    }
}
