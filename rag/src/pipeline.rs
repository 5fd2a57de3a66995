//! Stateless retrieval pipeline.
//!
//! Every function here is a pure composition over its arguments: collaborators are passed in
//! per call and all state lives in the [`FlatIndex`] / [`MetadataMap`] pair. Provider failures
//! surface as [`RagError::Provider`] and are never retried; wrap the call in a timeout or retry
//! policy from the outside if needed.

use sift_core::{AnswerGenerator, EmbeddingModel};

use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::metadata::MetadataMap;
use crate::types::{Chunk, EmbeddingRecord};

/// Chunks embedded between two progress log lines.
const PROGRESS_EVERY: usize = 10;

/// Context and distances for a query.
#[derive(Clone, Debug, PartialEq)]
pub struct Retrieval {
    /// Retrieved chunk texts, labelled `Chunk 1:`, `Chunk 2:`, ... and separated by blank lines.
    pub context: String,
    /// Squared Euclidean distance of each retrieved chunk, ascending.
    pub distances: Vec<f32>,
    /// Retrieved chunks, in the same order as `distances`.
    pub chunks: Vec<Chunk>,
}

/// A generated answer with the context it was grounded in.
#[derive(Clone, Debug, PartialEq)]
pub struct Answer {
    /// Generated answer text.
    pub answer: String,
    /// Context handed to the generator.
    pub context: String,
    /// Distances of the chunks making up the context.
    pub distances: Vec<f32>,
}

/// Formats chunks as a single context string.
///
/// ```rust
/// use sift_rag::{Chunk, pipeline::format_context};
///
/// let chunks = [Chunk::new("Cats sit.", 0, 9), Chunk::new("Dogs run.", 9, 18)];
/// assert_eq!(format_context(&chunks), "Chunk 1:\nCats sit.\n\nChunk 2:\nDogs run.");
/// ```
pub fn format_context<'a>(chunks: impl IntoIterator<Item = &'a Chunk>) -> String {
    let mut context: String = chunks
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| format!("Chunk {}:\n{}\n\n", i + 1, chunk.text))
        .collect();
    context.truncate(context.trim_end().len());
    context
}

/// Embeds `text`, finds its `k` nearest chunks and formats them as context.
///
/// `k` larger than the number of indexed chunks is not an error; every chunk is returned.
///
/// # Errors
/// - [`RagError::Provider`] if the embedder fails.
/// - [`RagError::DimensionMismatch`] if the query vector does not match the index.
/// - [`RagError::IndexOutOfRange`] if the index holds positions the map does not.
pub async fn query<M>(
    text: &str,
    k: usize,
    embedder: &M,
    index: &FlatIndex,
    map: &MetadataMap,
) -> Result<Retrieval>
where
    M: EmbeddingModel,
{
    let vector = embedder.embed(text).await.map_err(RagError::Provider)?;
    let neighbors = index.search(&vector, k)?;

    let positions: Vec<usize> = neighbors.iter().map(|n| n.position).collect();
    let chunks: Vec<Chunk> = map.resolve(&positions)?.into_iter().cloned().collect();
    let distances: Vec<f32> = neighbors.iter().map(|n| n.distance).collect();

    tracing::debug!(k, retrieved = chunks.len(), ?positions, "retrieved context");
    Ok(Retrieval {
        context: format_context(&chunks),
        distances,
        chunks,
    })
}

/// Retrieves context for `text` and asks `generator` for an answer.
///
/// # Errors
/// Everything [`query`] returns, plus [`RagError::Provider`] if the generator fails.
pub async fn answer<M, G>(
    text: &str,
    k: usize,
    embedder: &M,
    generator: &G,
    index: &FlatIndex,
    map: &MetadataMap,
) -> Result<Answer>
where
    M: EmbeddingModel,
    G: AnswerGenerator,
{
    let Retrieval {
        context, distances, ..
    } = query(text, k, embedder, index, map).await?;
    let answer = generator
        .generate(text, &context)
        .await
        .map_err(RagError::Provider)?;

    Ok(Answer {
        answer,
        context,
        distances,
    })
}

/// Embeds every chunk in order, pairing each vector with its chunk.
///
/// The first provider failure aborts the batch. Vectors whose length differs from
/// [`EmbeddingModel::dim`] are rejected.
///
/// # Errors
/// [`RagError::Provider`] or [`RagError::DimensionMismatch`].
pub async fn embed_chunks<M>(chunks: Vec<Chunk>, embedder: &M) -> Result<Vec<EmbeddingRecord>>
where
    M: EmbeddingModel,
{
    let total = chunks.len();
    let dimension = embedder.dim();
    let mut records = Vec::with_capacity(total);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let vector = embedder
            .embed(&chunk.text)
            .await
            .map_err(RagError::Provider)?;
        if vector.len() != dimension {
            return Err(RagError::DimensionMismatch {
                expected: dimension,
                actual: vector.len(),
            });
        }
        records.push(EmbeddingRecord::new(chunk, vector));

        if (i + 1) % PROGRESS_EVERY == 0 {
            tracing::debug!(embedded = i + 1, total, "embedding chunks");
        }
    }

    tracing::info!(total, dimension, "embedded chunks");
    Ok(records)
}
