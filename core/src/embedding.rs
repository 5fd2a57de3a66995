//! # Embedding Module
//!
//! An embedding model maps a piece of text to a dense vector of fixed length. Texts with similar
//! meaning land close to each other, which is what nearest-neighbour retrieval relies on.
//!
//! The retrieval pipeline calls an [`EmbeddingModel`] twice in a document's life:
//!
//! - once per chunk while a corpus is being built, and
//! - once per question at query time.
//!
//! Both calls must use the same model, otherwise the query vector and the stored vectors live in
//! different spaces (and usually have different dimensions, which the index rejects).
//!
//! ```rust
//! use sift_core::EmbeddingModel;
//!
//! async fn example<T: EmbeddingModel>(model: &T) -> sift_core::Result<()> {
//!     let dim = model.dim();
//!     let embedding = model.embed("What is a flat index?").await?;
//!     assert_eq!(embedding.len(), dim);
//!     Ok(())
//! }
//! ```

use alloc::vec::Vec;
use core::future::Future;

/// A dense embedding vector of 32-bit floats.
pub type Embedding = Vec<f32>;

/// Converts text to vector representations.
///
/// # Implementation Requirements
///
/// - [`embed`](EmbeddingModel::embed) must return vectors whose length equals [`dim`](EmbeddingModel::dim).
/// - Each call is a single request. Do not hide retries here if callers need predictable latency;
///   retry and backoff belong to whoever orchestrates the pipeline.
/// - Distances downstream are squared Euclidean. Normalize inside the model if cosine-like
///   ranking is wanted.
///
/// # Example
///
/// ```rust
/// use sift_core::EmbeddingModel;
///
/// struct ConstantEmbedding;
///
/// impl EmbeddingModel for ConstantEmbedding {
///     fn dim(&self) -> usize {
///         3
///     }
///
///     async fn embed(&self, _text: &str) -> sift_core::Result<Vec<f32>> {
///         Ok(vec![0.5; self.dim()])
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let embedding = ConstantEmbedding.embed("anything").await.unwrap();
/// assert_eq!(embedding, vec![0.5, 0.5, 0.5]);
/// # });
/// ```
pub trait EmbeddingModel: Send + Sync {
    /// Returns the embedding vector dimension.
    fn dim(&self) -> usize;

    /// Converts text to an embedding vector of length [`Self::dim`](EmbeddingModel::dim).
    ///
    /// # Errors
    ///
    /// Returns the provider's failure (transport, authentication, rate limit, ...) as-is.
    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send;
}

impl<T: EmbeddingModel> EmbeddingModel for &T {
    fn dim(&self) -> usize {
        (**self).dim()
    }

    fn embed(&self, text: &str) -> impl Future<Output = crate::Result<Embedding>> + Send {
        (**self).embed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct LengthEmbedding {
        dimension: usize,
    }

    impl EmbeddingModel for LengthEmbedding {
        fn dim(&self) -> usize {
            self.dimension
        }

        #[allow(clippy::cast_precision_loss)]
        async fn embed(&self, text: &str) -> crate::Result<Vec<f32>> {
            let mut embedding = vec![0.0; self.dimension];
            for (i, value) in embedding.iter_mut().enumerate() {
                *value = (text.len() + i) as f32;
            }
            Ok(embedding)
        }
    }

    struct FailingEmbedding;

    impl EmbeddingModel for FailingEmbedding {
        fn dim(&self) -> usize {
            2
        }

        async fn embed(&self, _text: &str) -> crate::Result<Vec<f32>> {
            Err(anyhow::anyhow!("rate limited"))
        }
    }

    #[tokio::test]
    async fn embedding_matches_dimension() {
        let model = LengthEmbedding { dimension: 4 };
        let embedding = model.embed("test").await.unwrap();
        assert_eq!(embedding.len(), model.dim());
        assert_eq!(embedding, vec![4.0, 5.0, 6.0, 7.0]);
    }

    async fn dim_and_embed<M: EmbeddingModel>(model: M, text: &str) -> (usize, Embedding) {
        let dim = model.dim();
        (dim, model.embed(text).await.unwrap())
    }

    #[tokio::test]
    async fn reference_forwards_to_model() {
        let model = LengthEmbedding { dimension: 2 };
        let (dim, embedding) = dim_and_embed(&model, "ab").await;
        assert_eq!(dim, 2);
        assert_eq!(embedding, vec![2.0, 3.0]);
    }

    #[tokio::test]
    async fn provider_error_is_returned() {
        let err = FailingEmbedding.embed("x").await.unwrap_err();
        assert_eq!(alloc::format!("{err}"), "rate limited");
    }
}
