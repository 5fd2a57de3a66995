//! Flat vector index for RAG.
//!
//! [`FlatIndex`] keeps every vector in one row-major matrix and answers queries by scanning all
//! rows. There is no pruning structure: a query costs `O(N·D)` and always returns the exact
//! nearest neighbours under squared Euclidean distance.
//!
//! The index is built once and then only read. Row `i` is the sole key into
//! [`MetadataMap`](crate::MetadataMap) position `i`, which is why both are normally handled
//! together through [`Corpus`](crate::Corpus).

mod flat;

pub use flat::{FlatIndex, PARALLEL_THRESHOLD, squared_euclidean};
