//! An index and its metadata map, kept together.

use std::path::Path;

use sift_core::{AnswerGenerator, EmbeddingModel};

use crate::config::RagConfig;
use crate::error::{RagError, Result};
use crate::index::FlatIndex;
use crate::metadata::MetadataMap;
use crate::persistence;
use crate::pipeline::{self, Answer, Retrieval};
use crate::types::EmbeddingRecord;

/// A [`FlatIndex`] and the [`MetadataMap`] describing its rows.
///
/// Both halves are built from the same ordered batch and are immutable afterwards, so a corpus
/// can be shared behind an `Arc` and queried from many tasks at once.
///
/// # Example
///
/// ```rust
/// use sift_rag::{Chunk, Corpus, EmbeddingRecord};
///
/// let corpus = Corpus::build(vec![
///     EmbeddingRecord::new(Chunk::new("cats", 0, 4), vec![0.0, 1.0]),
///     EmbeddingRecord::new(Chunk::new("dogs", 4, 8), vec![1.0, 0.0]),
/// ])
/// .unwrap();
///
/// assert_eq!(corpus.len(), 2);
/// assert_eq!(corpus.dimension(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Corpus {
    index: FlatIndex,
    map: MetadataMap,
}

impl Corpus {
    /// Builds a corpus from embedded chunks; record `i` becomes position `i`.
    ///
    /// # Errors
    /// See [`FlatIndex::build`].
    pub fn build(records: Vec<EmbeddingRecord>) -> Result<Self> {
        let index = FlatIndex::build(records.iter().map(|record| record.vector.as_slice()))?;
        let map = records.into_iter().map(|record| record.chunk).collect();
        Ok(Self { index, map })
    }

    /// Pairs an existing index with its map.
    ///
    /// # Errors
    /// [`RagError::CorruptPersistedState`] if the two disagree on the number of positions.
    pub fn from_parts(index: FlatIndex, map: MetadataMap) -> Result<Self> {
        if index.len() != map.len() {
            return Err(RagError::corrupt(
                "<corpus>",
                format!(
                    "index holds {} vectors but map holds {} records",
                    index.len(),
                    map.len()
                ),
            ));
        }
        Ok(Self { index, map })
    }

    /// Writes the index and the map to their files.
    ///
    /// Both files are staged before either target is replaced, so a failed save leaves the
    /// previous pair in place.
    ///
    /// # Errors
    /// [`RagError::Persistence`] on I/O failure.
    pub fn save(
        &self,
        index_path: impl AsRef<Path>,
        metadata_path: impl AsRef<Path>,
    ) -> Result<()> {
        let index_bytes = self.index.to_bytes()?;
        let map_bytes = self.map.to_json()?;
        persistence::write_all_atomic(&[
            (index_path.as_ref(), index_bytes.as_slice()),
            (metadata_path.as_ref(), map_bytes.as_slice()),
        ])
    }

    /// Reads a corpus written by [`Corpus::save`].
    ///
    /// # Errors
    /// [`RagError::Persistence`] on I/O failure, [`RagError::CorruptPersistedState`] if either
    /// file is malformed or they do not describe the same positions.
    pub fn load(index_path: impl AsRef<Path>, metadata_path: impl AsRef<Path>) -> Result<Self> {
        let metadata_path = metadata_path.as_ref();
        let index = FlatIndex::load(index_path)?;
        let map = MetadataMap::load(metadata_path)?;
        if index.len() != map.len() {
            return Err(RagError::corrupt(
                metadata_path,
                format!("{} records for an index of {} vectors", map.len(), index.len()),
            ));
        }
        Ok(Self { index, map })
    }

    /// Writes to the paths named in `config`.
    ///
    /// # Errors
    /// See [`Corpus::save`].
    pub fn save_to(&self, config: &RagConfig) -> Result<()> {
        self.save(&config.index_path, &config.metadata_path)
    }

    /// Reads from the paths named in `config`.
    ///
    /// # Errors
    /// See [`Corpus::load`].
    pub fn load_from(config: &RagConfig) -> Result<Self> {
        Self::load(&config.index_path, &config.metadata_path)
    }

    /// The vector index.
    #[must_use]
    pub const fn index(&self) -> &FlatIndex {
        &self.index
    }

    /// The metadata map.
    #[must_use]
    pub const fn map(&self) -> &MetadataMap {
        &self.map
    }

    /// Number of chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false`: a corpus holds at least one chunk.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Vector dimension.
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Splits the corpus back into its halves.
    #[must_use]
    pub fn into_parts(self) -> (FlatIndex, MetadataMap) {
        (self.index, self.map)
    }

    /// Retrieves the `k` chunks nearest to `text`. See [`pipeline::query`].
    ///
    /// # Errors
    /// See [`pipeline::query`].
    pub async fn query<M: EmbeddingModel>(
        &self,
        text: &str,
        k: usize,
        embedder: &M,
    ) -> Result<Retrieval> {
        pipeline::query(text, k, embedder, &self.index, &self.map).await
    }

    /// Answers `text` from the `k` nearest chunks. See [`pipeline::answer`].
    ///
    /// # Errors
    /// See [`pipeline::answer`].
    pub async fn answer<M, G>(
        &self,
        text: &str,
        k: usize,
        embedder: &M,
        generator: &G,
    ) -> Result<Answer>
    where
        M: EmbeddingModel,
        G: AnswerGenerator,
    {
        pipeline::answer(text, k, embedder, generator, &self.index, &self.map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use tempfile::tempdir;

    fn records() -> Vec<EmbeddingRecord> {
        vec![
            EmbeddingRecord::new(Chunk::new("zero", 0, 4), vec![0.0, 0.0]),
            EmbeddingRecord::new(Chunk::new("one", 4, 7), vec![1.0, 0.0]),
            EmbeddingRecord::new(Chunk::new("far", 7, 10), vec![10.0, 10.0]),
        ]
    }

    struct Axis;

    impl EmbeddingModel for Axis {
        fn dim(&self) -> usize {
            2
        }

        async fn embed(&self, text: &str) -> sift_core::Result<Vec<f32>> {
            Ok(if text == "far" { vec![9.0, 9.0] } else { vec![0.0, 0.0] })
        }
    }

    #[test]
    fn build_aligns_positions() {
        let corpus = Corpus::build(records()).unwrap();
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.map().get(2).unwrap().text, "far");
        assert_eq!(corpus.index().vector(2), Some(&[10.0, 10.0][..]));
    }

    #[test]
    fn build_rejects_empty_and_ragged_batches() {
        assert!(matches!(Corpus::build(Vec::new()), Err(RagError::EmptyInput)));

        let mut ragged = records();
        ragged[1].vector.push(3.0);
        assert!(matches!(
            Corpus::build(ragged),
            Err(RagError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn from_parts_checks_alignment() {
        let (index, map) = Corpus::build(records()).unwrap().into_parts();
        let short: MetadataMap = map.iter().take(2).cloned().collect();
        assert!(matches!(
            Corpus::from_parts(index.clone(), short),
            Err(RagError::CorruptPersistedState { .. })
        ));
        assert!(Corpus::from_parts(index, map).is_ok());
    }

    #[test]
    fn save_and_load_through_config() {
        let dir = tempdir().unwrap();
        let config = RagConfig::builder()
            .index_path(dir.path().join("vector_index.bin"))
            .metadata_path(dir.path().join("chunk_metadata.json"))
            .build()
            .unwrap();
        let corpus = Corpus::build(records()).unwrap();

        corpus.save_to(&config).unwrap();
        assert_eq!(Corpus::load_from(&config).unwrap(), corpus);
    }

    #[test]
    fn load_rejects_mismatched_files() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("index.bin");
        let metadata_path = dir.path().join("meta.json");

        Corpus::build(records())
            .unwrap()
            .save(&index_path, &metadata_path)
            .unwrap();
        MetadataMap::build(vec![Chunk::new("only", 0, 4)]).save(&metadata_path).unwrap();

        match Corpus::load(&index_path, &metadata_path) {
            Err(RagError::CorruptPersistedState { path, .. }) => {
                assert_eq!(path, metadata_path);
            }
            other => panic!("expected corrupt state, got {other:?}"),
        }
    }

    fn pair(texts: [&str; 2]) -> Corpus {
        Corpus::build(vec![
            EmbeddingRecord::new(Chunk::new(texts[0], 0, 5), vec![5.0, 5.0]),
            EmbeddingRecord::new(Chunk::new(texts[1], 5, 10), vec![0.0, 0.0]),
        ])
        .unwrap()
    }

    #[test]
    fn failed_save_keeps_the_previous_pair() {
        let dir = tempdir().unwrap();
        let index_path = dir.path().join("vector_index.bin");
        let metadata_path = dir.path().join("chunk_metadata.json");
        pair(["old-a", "old-b"]).save(&index_path, &metadata_path).unwrap();

        // The metadata file cannot be staged, after the index already could be.
        std::fs::create_dir(dir.path().join("chunk_metadata.json.tmp")).unwrap();
        let result = pair(["new-a", "new-b"]).save(&index_path, &metadata_path);
        assert!(matches!(result, Err(RagError::Persistence { .. })));

        let loaded = Corpus::load(&index_path, &metadata_path).unwrap();
        assert_eq!(loaded, pair(["old-a", "old-b"]));
        let nearest = loaded.index().search(&[0.0, 0.0], 1).unwrap()[0].position;
        assert_eq!(loaded.map().get(nearest).unwrap().text, "old-b");
    }

    #[tokio::test]
    async fn query_and_answer() {
        struct Echo;

        impl AnswerGenerator for Echo {
            async fn generate(&self, _query: &str, context: &str) -> sift_core::Result {
                Ok(context.to_owned())
            }
        }

        let corpus = Corpus::build(records()).unwrap();
        let retrieval = corpus.query("far", 1, &Axis).await.unwrap();
        assert_eq!(retrieval.context, "Chunk 1:\nfar");
        assert_eq!(retrieval.distances, [2.0]);

        let answer = corpus.answer("near", 2, &Axis, &Echo).await.unwrap();
        assert_eq!(answer.answer, "Chunk 1:\nzero\n\nChunk 2:\none");
    }
}
