use std::path::PathBuf;

use corpuschipper::{
    CompileReport,
    CompilerOptions,
    ExhaustPolicy,
    VocabPolicy,
    WalkOptions,
    compile_corpus,
};

use crate::{
    logging::LogArgs,
    tokenizer_select::{Backend, TokenizerArgs},
};

/// Args for the prepare command.
#[derive(clap::Args, Debug)]
pub struct PrepareArgs {
    /// Corpus root directory.
    root: PathBuf,

    #[clap(flatten)]
    logging: LogArgs,

    #[command(flatten)]
    tokenizer: TokenizerArgs,

    /// Training-split target size, in tokens.
    #[arg(long, default_value = "110000")]
    train_size: usize,

    /// Validation-split target size, in tokens.
    #[arg(long, default_value = "11000")]
    val_size: usize,

    /// Output directory for train.bin, val.bin and meta.json.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Visit directory entries in OS enumeration order instead of sorted.
    #[arg(long)]
    unsorted: bool,

    /// Abort on the first out-of-range token id.
    #[arg(long)]
    strict_vocab: bool,

    /// Fail if a split exhausts the corpus below its target size.
    #[arg(long)]
    require_target: bool,
}

impl PrepareArgs {
    /// Run the prepare command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let options = CompilerOptions {
            out_dir: self.out_dir.clone(),
            train_target: self.train_size,
            val_target: self.val_size,
            walk: WalkOptions {
                deterministic: !self.unsorted,
                on_exhausted: if self.require_target {
                    ExhaustPolicy::Fail
                } else {
                    ExhaustPolicy::Flush
                },
                vocab: if self.strict_vocab {
                    VocabPolicy::Fail
                } else {
                    VocabPolicy::Warn
                },
            },
        };

        let report = match self.tokenizer.load()? {
            Backend::Script(tokenizer) => {
                compile_corpus::<u16>(&self.root, &tokenizer, &options)?
            }
            Backend::Subword(tokenizer) => {
                compile_corpus::<u32>(&self.root, &tokenizer, &options)?
            }
        };
        log_report(&report);

        Ok(())
    }
}

fn log_report(report: &CompileReport) {
    for split in [&report.train, &report.val] {
        log::info!(
            "{}: {} tokens from {} files ({} rejected, {} skipped, {} vocab mismatches)",
            split.name,
            split.tokens,
            split.files_consumed,
            split.files_rejected,
            split.files_skipped,
            split.vocab_mismatches,
        );
    }
    log::info!("vocab_size: {}", report.manifest.vocab_size);
}
