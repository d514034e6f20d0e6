//! # Token Accumulator
//!
//! The in-memory stream backing one output split, and its raw
//! fixed-width serialization.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{CCResult, CorpusError},
    types::TokenType,
};

/// An ordered, growable stream of fixed-width tokens for one output split.
///
/// The stream lives entirely in memory until [`TokenAccumulator::flush_to`];
/// there is no incremental write path. Token values repeat freely; only
/// source files are deduplicated, upstream of the accumulator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenAccumulator<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType> TokenAccumulator<T> {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Concatenate tokens onto the end of the stream, preserving order.
    pub fn append(
        &mut self,
        tokens: &[T],
    ) {
        self.tokens.extend_from_slice(tokens);
    }

    /// Current stream length, in tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the stream is empty.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The accumulated tokens, in encounter order.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Serialize the full stream as raw fixed-width little-endian integers.
    ///
    /// No header, no length prefix, no delimiter: the byte length divided
    /// by `size_of::<T>()` is the token count.
    ///
    /// ## Arguments
    /// * `writer` - The destination writer.
    pub fn flush_to<W: Write>(
        &self,
        writer: &mut W,
    ) -> CCResult<()> {
        let width = size_of::<T>();
        for &token in &self.tokens {
            let value = token.to_u64().ok_or(CorpusError::TokenOutOfRange)?;
            writer.write_all(&value.to_le_bytes()[..width])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Serialize the full stream to a file; see [`TokenAccumulator::flush_to`].
    pub fn flush_to_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CCResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.flush_to(&mut writer)
    }

    /// Empty the stream for the next split.
    pub fn reset(&mut self) {
        self.tokens.clear();
    }
}

/// Re-read a raw fixed-width little-endian stream produced by
/// [`TokenAccumulator::flush_to`].
///
/// ## Arguments
/// * `bytes` - The raw stream bytes.
///
/// ## Returns
/// The token sequence, in stream order; or a parse error if the byte
/// length is not a multiple of the element width.
pub fn tokens_from_le_bytes<T: TokenType>(bytes: &[u8]) -> CCResult<Vec<T>> {
    let width = size_of::<T>();
    if bytes.len() % width != 0 {
        return Err(CorpusError::Parse(format!(
            "byte length {} is not a multiple of the element width {width}",
            bytes.len()
        )));
    }

    bytes
        .chunks_exact(width)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf[..width].copy_from_slice(chunk);
            T::from_u64(u64::from_le_bytes(buf)).ok_or(CorpusError::TokenOutOfRange)
        })
        .collect()
}
