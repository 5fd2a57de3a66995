//! Core types for the RAG crate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key/value metadata attached to chunks.
pub type Metadata = BTreeMap<String, MetadataValue>;

/// A metadata value: text, an integer, or nothing.
///
/// Serialized untagged, so a value reads as a plain JSON string, number or `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Absent value, e.g. a chunk produced without a document id.
    Null,
    /// Integer value.
    Integer(i64),
    /// Text value.
    Text(String),
}

impl MetadataValue {
    /// Returns the text if this is a [`MetadataValue::Text`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer if this is a [`MetadataValue::Integer`].
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns `true` for [`MetadataValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for MetadataValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A segment of a document's text.
///
/// `start_offset` and `end_offset` are character positions into the original document, not into
/// `text`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of the chunk.
    pub text: String,
    /// Document id, strategy name and configured size, plus anything callers add.
    pub metadata: Metadata,
    /// First character position covered by the chunk.
    #[serde(alias = "start_char")]
    pub start_offset: usize,
    /// One past the last character position covered by the chunk.
    #[serde(alias = "end_char")]
    pub end_offset: usize,
}

impl Chunk {
    /// Creates a chunk with empty metadata.
    #[must_use]
    pub fn new(text: impl Into<String>, start_offset: usize, end_offset: usize) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
            start_offset,
            end_offset,
        }
    }

    /// Creates a chunk with metadata.
    #[must_use]
    pub fn with_metadata(
        text: impl Into<String>,
        metadata: Metadata,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Self {
            text: text.into(),
            metadata,
            start_offset,
            end_offset,
        }
    }

    /// The `doc_id` metadata entry, if it is text.
    #[must_use]
    pub fn doc_id(&self) -> Option<&str> {
        self.metadata.get("doc_id").and_then(MetadataValue::as_str)
    }
}

/// A chunk paired with the vector its text was embedded to.
///
/// Serialized flat: the chunk's fields sit next to an `embedding` array.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// The embedded chunk.
    #[serde(flatten)]
    pub chunk: Chunk,
    /// The embedding vector.
    #[serde(rename = "embedding")]
    pub vector: Vec<f32>,
}

impl EmbeddingRecord {
    /// Creates a new embedding record.
    #[must_use]
    pub const fn new(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self { chunk, vector }
    }

    /// Length of the vector.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// A search hit: a position in the index and its squared Euclidean distance to the query.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Row of the matching vector, also its key in the metadata map.
    pub position: usize,
    /// Squared Euclidean distance (0.0 means identical).
    pub distance: f32,
}
