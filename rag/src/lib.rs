//! Retrieval-augmented generation over a flat vector index.
//!
//! The crate turns documents into answerable context in four steps:
//!
//! 1. [`chunking`] splits text into [`Chunk`]s by characters, sentences or paragraphs.
//! 2. [`pipeline::embed_chunks`] embeds every chunk through any
//!    [`EmbeddingModel`](sift_core::EmbeddingModel), producing [`EmbeddingRecord`]s.
//! 3. [`Corpus::build`] stores the vectors in a [`FlatIndex`] and the chunks in a
//!    [`MetadataMap`], aligned by position, and [`Corpus::save`] persists both.
//! 4. [`Corpus::query`] embeds a question, scans the index for the nearest chunks and formats them
//!    as context; [`Corpus::answer`] hands that context to an
//!    [`AnswerGenerator`](sift_core::AnswerGenerator).
//!
//! Search is exact: every query scans all vectors under squared Euclidean distance, splitting the
//! scan across threads with `rayon` once the index is large. A corpus is immutable after it is
//! built, so it can be shared between tasks without locks.
//!
//! ```rust
//! use sift_rag::{Chunk, Corpus, EmbeddingRecord};
//! # use sift_core::EmbeddingModel;
//! # struct Fixed;
//! # impl EmbeddingModel for Fixed {
//! #     fn dim(&self) -> usize { 2 }
//! #     async fn embed(&self, _text: &str) -> sift_core::Result<Vec<f32>> { Ok(vec![0.0, 0.0]) }
//! # }
//!
//! # tokio_test::block_on(async {
//! let corpus = Corpus::build(vec![
//!     EmbeddingRecord::new(Chunk::new("Cats sit.", 0, 9), vec![0.0, 0.0]),
//!     EmbeddingRecord::new(Chunk::new("Dogs run.", 9, 18), vec![5.0, 5.0]),
//! ])
//! .unwrap();
//!
//! let retrieval = corpus.query("Who sits?", 1, &Fixed).await.unwrap();
//! assert_eq!(retrieval.context, "Chunk 1:\nCats sit.");
//! # });
//! ```

pub mod chunking;
pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod metadata;
pub mod persistence;
pub mod pipeline;
pub mod types;

pub use chunking::{Chunker, Strategy, chunk};
pub use config::{RagConfig, RagConfigBuilder};
pub use corpus::Corpus;
pub use error::{RagError, Result};
pub use index::FlatIndex;
pub use metadata::MetadataMap;
pub use pipeline::{Answer, Retrieval, embed_chunks, format_context};
pub use types::{Chunk, EmbeddingRecord, Metadata, MetadataValue, Neighbor};

pub use sift_core::{AnswerGenerator, EmbeddingModel, GroundedPrompt};
