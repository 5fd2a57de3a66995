#![no_std]
//! # sift
//!
//! Façade crate that re-exports the collaborator traits from [`sift_core`] and, with the default
//! `rag` feature, the retrieval pipeline from `sift-rag` as [`rag`].
//!
//! ## What's inside?
//!
//! - [`EmbeddingModel`] and [`AnswerGenerator`], the two traits a provider implements.
//! - [`GroundedPrompt`], a context-only prompt template for chat-completion backends.
//! - `rag`: chunking, the flat vector index, persistence and the query pipeline.
//!
//! ## Example
//!
//! ```rust
//! use sift::EmbeddingModel;
//! use sift::rag::{Chunk, Corpus, Strategy, chunk, embed_chunks};
//!
//! struct Letters;
//!
//! impl EmbeddingModel for Letters {
//!     fn dim(&self) -> usize {
//!         2
//!     }
//!
//!     async fn embed(&self, text: &str) -> sift::Result<Vec<f32>> {
//!         let vowels = text.chars().filter(|c| "aeiou".contains(*c)).count();
//!         Ok(vec![vowels as f32, (text.len() - vowels) as f32])
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let text = "Cats sit. Dogs run far.";
//! let chunks: Vec<Chunk> = chunk(text, Strategy::Sentence, 12, 0, None).unwrap();
//! let records = embed_chunks(chunks, &Letters).await.unwrap();
//! let corpus = Corpus::build(records).unwrap();
//!
//! let retrieval = corpus.query("Cats", 1, &Letters).await.unwrap();
//! assert!(retrieval.context.starts_with("Chunk 1:\n"));
//! # });
//! ```

pub use sift_core::*;

#[cfg(feature = "rag")]
#[doc(inline)]
pub use sift_rag as rag;
