//! Fixed-size character chunking.

use crate::error::Result;
use crate::types::Chunk;

use super::{Chunker, Strategy, chunk_metadata, validate};

/// Chunks text into fixed-size character windows with retroactive overlap.
///
/// Window `k` starts at `k * chunk_size`, pulled back by `overlap` characters for every window
/// after the first, and ends at `(k + 1) * chunk_size` clamped to the text length. The stride is
/// always `chunk_size`; the overlap only re-reads the tail of the previous window.
///
/// # Example
///
/// ```rust
/// use sift_rag::chunking::{CharacterChunker, Chunker};
///
/// let chunker = CharacterChunker::new(10, 3).unwrap();
/// let chunks = chunker.chunk("A cat sat. A dog ran far away today.", None);
/// assert_eq!(chunks.len(), 4);
/// assert_eq!((chunks[1].start_offset, chunks[1].end_offset), (7, 20));
/// ```
#[derive(Debug, Clone)]
pub struct CharacterChunker {
    /// Fresh characters per window.
    chunk_size: usize,
    /// Characters re-read from the previous window.
    overlap: usize,
}

impl CharacterChunker {
    /// Creates a new character chunker.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`](crate::RagError::InvalidConfiguration) if
    /// `chunk_size` is zero or `overlap >= chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        validate(chunk_size, overlap)?;
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Number of characters re-read from the previous window.
    #[must_use]
    pub const fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for CharacterChunker {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

/// Character spans `[start, end)` of every window over a text of `len` characters.
///
/// Terminates for any `chunk_size >= 1` whatever the overlap, because the fresh start advances by
/// `chunk_size` each step.
fn windows(len: usize, chunk_size: usize, overlap: usize) -> Vec<(usize, usize)> {
    if chunk_size == 0 {
        return Vec::new();
    }
    let mut spans = Vec::with_capacity(len.div_ceil(chunk_size));
    let mut fresh = 0usize;
    while fresh < len {
        let start = if fresh == 0 {
            0
        } else {
            fresh.saturating_sub(overlap)
        };
        let end = fresh.saturating_add(chunk_size).min(len);
        spans.push((start, end));
        fresh = fresh.saturating_add(chunk_size);
    }
    spans
}

impl Chunker for CharacterChunker {
    fn chunk(&self, text: &str, doc_id: Option<&str>) -> Vec<Chunk> {
        // Byte position of every character boundary, including the end of the text.
        let bounds: Vec<usize> = text
            .char_indices()
            .map(|(pos, _)| pos)
            .chain(std::iter::once(text.len()))
            .collect();
        let len = bounds.len() - 1;
        let metadata = chunk_metadata(doc_id, Strategy::Character, self.chunk_size);

        windows(len, self.chunk_size, self.overlap)
            .into_iter()
            .map(|(start, end)| {
                Chunk::with_metadata(
                    &text[bounds[start]..bounds[end]],
                    metadata.clone(),
                    start,
                    end,
                )
            })
            .collect()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Character
    }

    fn size(&self) -> usize {
        self.chunk_size
    }
}
