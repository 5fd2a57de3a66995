//! Sentence-based text chunking.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{RagError, Result};
use crate::types::Chunk;

use super::{Chunker, Strategy, char_len, chunk_metadata};

/// Terminal punctuation followed by the whitespace run that separates two sentences.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence break pattern is valid"));

/// Sentences of `text`, split on whitespace that directly follows `.`, `!` or `?`.
///
/// The punctuation stays with its sentence and the whitespace run is dropped. A trailing break
/// leaves an empty final sentence, and text without any break is a single sentence.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;
    for found in SENTENCE_BREAK.find_iter(text) {
        // The punctuation mark is a single ASCII byte.
        sentences.push(&text[last..=found.start()]);
        last = found.end();
    }
    sentences.push(&text[last..]);
    sentences
}

/// Chunks text by sentence boundaries.
///
/// Sentences are packed greedily until the summed sentence lengths (plus one separator per
/// sentence) would pass `max_chunk_size`. The chunk is then emitted, joined with single spaces,
/// and the next one starts from the last two sentences of the emitted chunk. The carry is always
/// those two whole sentences, never the previous carry plus more, so it does not grow from chunk
/// to chunk.
///
/// Offsets follow a running cursor: a chunk ends `len(text)` characters after its start, and the
/// next chunk starts where the carried-over sentences begin inside that span. They approximate,
/// rather than reproduce, source positions.
///
/// # Example
///
/// ```rust
/// use sift_rag::chunking::{Chunker, SentenceChunker};
///
/// let chunker = SentenceChunker::new(500).unwrap();
/// let chunks = chunker.chunk("First sentence. Second sentence. Third sentence.", Some("doc1"));
/// assert_eq!(chunks.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    /// Maximum size of each chunk in characters.
    max_chunk_size: usize,
}

impl SentenceChunker {
    /// Number of trailing sentences carried into the next chunk.
    pub const CARRIED_SENTENCES: usize = 2;

    /// Creates a new sentence chunker.
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
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
        }
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str, doc_id: Option<&str>) -> Vec<Chunk> {
        if text.is_empty() {
            return Vec::new();
        }

        let metadata = chunk_metadata(doc_id, Strategy::Sentence, self.max_chunk_size);
        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_length = 0usize;
        let mut chunk_start = 0usize;

        for sentence in split_sentences(text) {
            let sentence_length = char_len(sentence);

            if !current.is_empty() && current_length + sentence_length > self.max_chunk_size {
                let chunk_text = current.join(" ");
                let chunk_end = chunk_start + char_len(&chunk_text);
                chunks.push(Chunk::with_metadata(
                    chunk_text,
                    metadata.clone(),
                    chunk_start,
                    chunk_end,
                ));

                let carried = current.len().saturating_sub(Self::CARRIED_SENTENCES);
                current.drain(..carried);
                let carried_length = char_len(&current.join(" "));
                current_length = carried_length;
                chunk_start = chunk_end - carried_length;
            }

            current.push(sentence);
            current_length += sentence_length + 1;
        }

        if !current.is_empty() {
            let chunk_text = current.join(" ");
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
        Strategy::Sentence
    }

    fn size(&self) -> usize {
        self.max_chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(chunks: &[Chunk]) -> Vec<(&str, usize, usize)> {
        chunks
            .iter()
            .map(|c| (c.text.as_str(), c.start_offset, c.end_offset))
            .collect()
    }

    #[test]
    fn splits_after_terminal_punctuation_only() {
        assert_eq!(
            split_sentences("Hi there. How are you?  Fine!\nGood e.g.x end"),
            ["Hi there.", "How are you?", "Fine!", "Good e.g.x end"]
        );
        assert_eq!(split_sentences("No break here"), ["No break here"]);
        assert_eq!(split_sentences("Trailing. "), ["Trailing.", ""]);
    }

    #[test]
    fn small_text_single_chunk() {
        let chunker = SentenceChunker::new(500).unwrap();
        let chunks = chunker.chunk("Short sentence.", Some("doc1"));

        assert_eq!(spans(&chunks), [("Short sentence.", 0, 15)]);
    }

    #[test]
    fn carries_last_two_sentences() {
        let chunker = SentenceChunker::new(10).unwrap();
        let chunks = chunker.chunk("One. Two. Three. Four.", None);

        assert_eq!(
            spans(&chunks),
            [
                ("One. Two.", 0, 9),
                ("One. Two. Three.", 0, 16),
                ("Two. Three. Four.", 5, 22),
            ]
        );
    }

    #[test]
    fn carry_stays_two_sentences_long() {
        let chunker = SentenceChunker::new(10).unwrap();
        let chunks = chunker.chunk("A. B. C. D. E. F. G.", None);

        assert_eq!(
            spans(&chunks),
            [
                ("A. B. C.", 0, 8),
                ("B. C. D. E.", 3, 14),
                ("D. E. F. G.", 9, 20),
            ]
        );
    }

    #[test]
    fn sentences_grouped_within_limit() {
        let chunker = SentenceChunker::new(100).unwrap();
        let chunks = chunker.chunk("Short. Also short. Still short.", None);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Short. Also short. Still short.");
    }

    #[test]
    fn oversized_sentence_is_kept_whole() {
        let long = "This single sentence is much longer than the configured size.";
        let chunker = SentenceChunker::new(10).unwrap();
        let chunks = chunker.chunk(&format!("Tiny. {long} End."), None);

        assert!(chunks.iter().any(|c| c.text.contains(long)));
        assert!(chunks.iter().all(|c| c.metadata["strategy"].as_str() == Some("sentence")));
    }

    #[test]
    fn every_sentence_survives_and_size_is_bounded() {
        let sentences = [
            "Rust is fast.",
            "It has no garbage collector!",
            "Why would anyone want that?",
            "Because latency matters.",
            "Ownership keeps memory safe.",
            "Borrowing keeps it cheap.",
            "Done.",
        ];
        let text = sentences.join(" ");
        let longest = sentences.iter().map(|s| s.chars().count()).max().unwrap();

        for size in (2 * longest + 2)..(3 * longest) {
            let chunks = SentenceChunker::new(size).unwrap().chunk(&text, None);
            assert!(!chunks.is_empty());
            for sentence in sentences {
                assert!(chunks.iter().any(|c| c.text.contains(sentence)), "{sentence}");
            }
            for c in &chunks {
                assert!(c.text.chars().count() <= size + longest, "size {size}: {:?}", c.text);
            }
        }
    }

    #[test]
    fn whitespace_only_text_still_yields_a_chunk() {
        let chunks = SentenceChunker::new(10).unwrap().chunk("   ", None);
        assert_eq!(spans(&chunks), [("   ", 0, 3)]);
    }
}
