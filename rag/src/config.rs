//! Configuration for RAG.

use std::path::PathBuf;

use crate::chunking::{Chunker, Strategy};
use crate::error::{RagError, Result};

/// Configuration for building and querying a corpus.
#[derive(Debug, Clone)]
pub struct RagConfig {
    /// Path of the binary vector index file.
    pub index_path: PathBuf,
    /// Path of the JSON metadata map stored next to the index.
    pub metadata_path: PathBuf,
    /// Chunking strategy.
    pub strategy: Strategy,
    /// Chunk size in characters.
    pub chunk_size: usize,
    /// Overlap between consecutive character chunks.
    pub chunk_overlap: usize,
    /// Default number of chunks to retrieve per query.
    pub top_k: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            index_path: PathBuf::from("./vector_index.bin"),
            metadata_path: PathBuf::from("./chunk_metadata.json"),
            strategy: Strategy::Character,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
        }
    }
}

impl RagConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::new()
    }

    /// Checks the chunking parameters and `top_k`.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] if `chunk_size` is zero, `chunk_overlap >= chunk_size`,
    /// or `top_k` is zero.
    pub fn validate(&self) -> Result<()> {
        crate::chunking::validate(self.chunk_size, self.chunk_overlap)?;
        if self.top_k == 0 {
            return Err(RagError::InvalidConfiguration(
                "top_k must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Builds the configured chunker.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] for unusable chunk parameters.
    pub fn chunker(&self) -> Result<Box<dyn Chunker>> {
        self.strategy.chunker(self.chunk_size, self.chunk_overlap)
    }
}

/// Builder for RAG configuration.
#[derive(Debug, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Creates a new configuration builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RagConfig::default(),
        }
    }

    /// Sets the index file path.
    #[must_use]
    pub fn index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.index_path = path.into();
        self
    }

    /// Sets the metadata file path.
    #[must_use]
    pub fn metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.metadata_path = path.into();
        self
    }

    /// Sets the chunking strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: Strategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Sets the chunk size in characters.
    ///
    /// The overlap is validated against every strategy, so lower it as well when going below
    /// the default overlap of 200.
    #[must_use]
    pub const fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Sets the overlap between character chunks.
    #[must_use]
    pub const fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Sets the default number of results to retrieve.
    #[must_use]
    pub const fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// See [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
