//! JSON metadata file.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::path::Path;

use crate::error::{RagError, Result};
use crate::metadata::MetadataMap;
use crate::types::Chunk;

const IN_MEMORY: &str = "<memory>";

/// Raw `(key, record)` pairs in file order, duplicates included.
struct Entries(Vec<(String, Chunk)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object keyed by chunk position")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Entries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Chunk>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses a position key: plain ASCII digits only, so no sign, whitespace or exponent.
fn parse_position(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

fn decode(bytes: &[u8], source: &Path) -> Result<MetadataMap> {
    let Entries(entries) = serde_json::from_slice(bytes)?;

    let mut slots: Vec<Option<Chunk>> = vec![None; entries.len()];
    for (key, chunk) in entries {
        let position = parse_position(&key).ok_or_else(|| {
            RagError::corrupt(source, format!("key `{key}` is not a non-negative integer"))
        })?;
        let total = slots.len();
        let slot = slots.get_mut(position).ok_or_else(|| {
            RagError::corrupt(
                source,
                format!("position {position} leaves a gap in {total} records"),
            )
        })?;
        if slot.replace(chunk).is_some() {
            return Err(RagError::corrupt(
                source,
                format!("position {position} appears more than once"),
            ));
        }
    }

    // Every slot is filled: `len` distinct positions, each below `len`.
    Ok(slots.into_iter().flatten().collect())
}

impl MetadataMap {
    /// Encodes the map as a JSON object keyed by decimal position.
    ///
    /// # Errors
    /// [`RagError::Serialization`] if a record cannot be encoded.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Decodes a map produced by [`MetadataMap::to_json`].
    ///
    /// Field names `start_char`/`end_char` are accepted for the offsets.
    ///
    /// # Errors
    /// [`RagError::Serialization`] on malformed JSON, [`RagError::CorruptPersistedState`] if a key
    /// is not a decimal position or the positions are not exactly `0..N`.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        decode(bytes, Path::new(IN_MEMORY))
    }

    /// Writes the map to `path`.
    ///
    /// # Errors
    /// [`RagError::Persistence`] on I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        super::write_atomic(path.as_ref(), &self.to_json()?)
    }

    /// Reads a map from `path`.
    ///
    /// # Errors
    /// See [`MetadataMap::from_json`]; I/O failures are [`RagError::Persistence`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let map = decode(&super::read(path)?, path)?;
        tracing::info!(path = %path.display(), records = map.len(), "loaded metadata map");
        Ok(map)
    }
}
