use std::path::PathBuf;

use corpuschipper::{ScriptTokenizer, SubwordTokenizer};

/// Tokenizer backend selector arg group.
#[derive(clap::Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TokenizerArgs {
    /// Script-character backend: a JSON vocabulary table (16-bit stream).
    #[arg(long)]
    script_vocab: Option<PathBuf>,

    /// Subword backend: a `tokenizer.json` file (32-bit stream).
    #[arg(long)]
    subword: Option<PathBuf>,
}

/// A mounted backend, tagged with its output token width.
pub enum Backend {
    /// Bounded-vocabulary script tokenizer; 16-bit stream elements.
    Script(ScriptTokenizer),

    /// Subword tokenizer; 32-bit stream elements.
    Subword(SubwordTokenizer),
}

impl TokenizerArgs {
    /// Load the selected backend.
    pub fn load(&self) -> Result<Backend, Box<dyn std::error::Error>> {
        if let Some(path) = &self.script_vocab {
            Ok(Backend::Script(ScriptTokenizer::from_file(path)?))
        } else if let Some(path) = &self.subword {
            Ok(Backend::Subword(SubwordTokenizer::from_file(path)?))
        } else {
            panic!("No tokenizer backend selected.");
        }
    }
}
