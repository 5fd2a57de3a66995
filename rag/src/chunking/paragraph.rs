//! Paragraph-based text chunking.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{RagError, Result};
use crate::types::Chunk;

use super::{Chunker, Strategy, char_len, chunk_metadata};

/// One or more blank lines.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

const SEPARATOR: &str = "\n\n";
const SEPARATOR_LEN: usize = SEPARATOR.len();

/// Chunks text by paragraph boundaries (blank lines).
///
/// Paragraphs are trimmed, empty ones skipped, and the rest packed greedily (joined with a blank
/// line) until the next one would pass `max_chunk_size`. Nothing is carried between chunks. A
/// paragraph larger than the limit becomes a chunk of its own.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    max_chunk_size: usize,
}

impl ParagraphChunker {
    /// Creates a paragraph chunker with a maximum chunk size in characters.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] if `max_chunk_size` is zero.
    pub fn new(max_chunk_size: usize) -> Result<Self> {
        if max_chunk_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "chunk size must be at least 1".into(),
            ));
        }
        Ok(Self { max_chunk_size })
    }

    fn paragraphs(text: &str) -> impl Iterator<Item = &str> {
        PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|paragraph| !paragraph.is_empty())
    }
}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
        }
    }
}

impl Chunker for ParagraphChunker {
    fn chunk(&self, text: &str, doc_id: Option<&str>) -> Vec<Chunk> {
        let metadata = chunk_metadata(doc_id, Strategy::Paragraph, self.max_chunk_size);
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_length = 0usize;
        let mut chunk_start = 0usize;

        for paragraph in Self::paragraphs(text) {
            let paragraph_length = char_len(paragraph);

            if !current.is_empty() && current_length + paragraph_length > self.max_chunk_size {
                let chunk_text = current.join(SEPARATOR);
                let chunk_end = chunk_start + char_len(&chunk_text);
                chunks.push(Chunk::with_metadata(
                    chunk_text,
                    metadata.clone(),
                    chunk_start,
                    chunk_end,
                ));
                current.clear();
                current_length = 0;
                chunk_start = chunk_end + SEPARATOR_LEN;
            }

            current.push(paragraph);
            current_length += paragraph_length + SEPARATOR_LEN;
        }

        if !current.is_empty() {
            let chunk_text = current.join(SEPARATOR);
            let chunk_end = chunk_start + char_len(&chunk_text);
            chunks.push(Chunk::with_metadata(
                chunk_text,
                metadata,
                chunk_start,
                chunk_end,
            ));
        }

        chunks
    }

    fn strategy(&self) -> Strategy {
        Strategy::Paragraph
    }

    fn size(&self) -> usize {
        self.max_chunk_size
    }
}
