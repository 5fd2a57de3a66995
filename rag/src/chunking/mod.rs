//! Text chunking strategies for RAG.
//!
//! This module provides the [`Chunker`] trait and implementations for
//! splitting documents into smaller, indexable chunks.
//!
//! All sizes and offsets are counted in characters (Unicode scalar values), never bytes.
//! Chunking never fails on the text itself: malformed or degenerate input yields a best-effort,
//! possibly empty, list of chunks. Only the size/overlap parameters are validated.

mod character;
mod paragraph;
mod sentence;

pub use character::CharacterChunker;
pub use paragraph::ParagraphChunker;
pub use sentence::SentenceChunker;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RagError, Result};
use crate::types::{Chunk, Metadata, MetadataValue};

/// Trait for text chunking strategies.
///
/// - [`CharacterChunker`]: fixed windows with retroactive overlap
/// - [`SentenceChunker`]: greedy sentence packing, carrying the last two sentences forward
/// - [`ParagraphChunker`]: greedy paragraph packing without overlap
pub trait Chunker: Send + Sync {
    /// Splits `text` into ordered chunks. `doc_id` is recorded in every chunk's metadata.
    fn chunk(&self, text: &str, doc_id: Option<&str>) -> Vec<Chunk>;

    /// The strategy this chunker implements.
    fn strategy(&self) -> Strategy;

    /// Configured chunk size in characters.
    fn size(&self) -> usize;
}

/// Chunking strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fixed-size character windows.
    Character,
    /// Sentence packing.
    Sentence,
    /// Paragraph packing.
    Paragraph,
}

impl Strategy {
    /// Name recorded in chunk metadata.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        }
    }

    /// Builds a chunker for this strategy.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] if `size` is zero or `overlap >= size`.
    pub fn chunker(self, size: usize, overlap: usize) -> Result<Box<dyn Chunker>> {
        validate(size, overlap)?;
        Ok(match self {
            Self::Character => Box::new(CharacterChunker::new(size, overlap)?),
            Self::Sentence => Box::new(SentenceChunker::new(size)?),
            Self::Paragraph => Box::new(ParagraphChunker::new(size)?),
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "character" | "char" => Ok(Self::Character),
            "sentence" => Ok(Self::Sentence),
            "paragraph" => Ok(Self::Paragraph),
            other => Err(RagError::InvalidConfiguration(format!(
                "unknown chunking strategy `{other}`"
            ))),
        }
    }
}

/// Chunks `text` with the given strategy.
///
/// # Errors
/// [`RagError::InvalidConfiguration`] if `size` is zero or `overlap >= size`.
///
/// # Example
///
/// ```rust
/// use sift_rag::chunking::{chunk, Strategy};
///
/// let text = "A cat sat. A dog ran far away today.";
/// let chunks = chunk(text, Strategy::Character, 10, 3, Some("pets")).unwrap();
/// assert_eq!(chunks[0].text, "A cat sat.");
/// assert_eq!(chunks[1].text, "at. A dog ran");
/// ```
pub fn chunk(
    text: &str,
    strategy: Strategy,
    size: usize,
    overlap: usize,
    doc_id: Option<&str>,
) -> Result<Vec<Chunk>> {
    let chunker = strategy.chunker(size, overlap)?;
    let chunks = chunker.chunk(text, doc_id);
    tracing::debug!(
        strategy = %strategy,
        size,
        overlap,
        chunks = chunks.len(),
        doc_id = doc_id.unwrap_or_default(),
        "chunked text"
    );
    Ok(chunks)
}

pub(crate) fn validate(size: usize, overlap: usize) -> Result<()> {
    if size == 0 {
        return Err(RagError::InvalidConfiguration(
            "chunk size must be at least 1".into(),
        ));
    }
    if overlap >= size {
        return Err(RagError::InvalidConfiguration(format!(
            "overlap ({overlap}) must be less than chunk size ({size})"
        )));
    }
    Ok(())
}

/// Metadata every chunk carries.
fn chunk_metadata(doc_id: Option<&str>, strategy: Strategy, size: usize) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("doc_id".into(), MetadataValue::from(doc_id));
    metadata.insert("strategy".into(), strategy.name().into());
    metadata.insert(
        "chunk_size".into(),
        MetadataValue::Integer(i64::try_from(size).unwrap_or(i64::MAX)),
    );
    metadata
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_round_trip() {
        for strategy in [Strategy::Character, Strategy::Sentence, Strategy::Paragraph] {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
            assert_eq!(strategy.chunker(10, 2).unwrap().strategy(), strategy);
        }
        assert!("semantic".parse::<Strategy>().is_err());
    }

    #[test]
    fn invalid_parameters_rejected_for_every_strategy() {
        for strategy in [Strategy::Character, Strategy::Sentence, Strategy::Paragraph] {
            assert!(matches!(
                chunk("text", strategy, 0, 0, None),
                Err(RagError::InvalidConfiguration(_))
            ));
            assert!(matches!(
                chunk("text", strategy, 5, 5, None),
                Err(RagError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        for strategy in [Strategy::Character, Strategy::Sentence, Strategy::Paragraph] {
            assert!(chunk("", strategy, 10, 2, Some("doc")).unwrap().is_empty());
        }
    }

    #[test]
    fn every_chunk_carries_base_metadata() {
        let text = "One. Two.\n\nThree. Four.";
        for strategy in [Strategy::Character, Strategy::Sentence, Strategy::Paragraph] {
            let chunks = chunk(text, strategy, 8, 2, Some("doc-7")).unwrap();
            assert!(!chunks.is_empty());
            for c in &chunks {
                assert_eq!(c.doc_id(), Some("doc-7"));
                assert_eq!(c.metadata["strategy"].as_str(), Some(strategy.name()));
                assert_eq!(c.metadata["chunk_size"].as_i64(), Some(8));
            }
        }
    }

    #[test]
    fn missing_doc_id_is_null() {
        let chunks = chunk("abc", Strategy::Character, 10, 0, None).unwrap();
        assert!(chunks[0].metadata["doc_id"].is_null());
    }
}
