//! Binary index file.

use std::path::Path;

use crate::error::{RagError, Result};
use crate::index::FlatIndex;

/// Bytes taken by the `{count, dimension}` header.
pub const HEADER_LEN: usize = 8;

const FLOAT_LEN: usize = size_of::<f32>();

/// Source name used in errors for in-memory buffers.
const IN_MEMORY: &str = "<memory>";

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn decode(bytes: &[u8], source: &Path) -> Result<FlatIndex> {
    if bytes.len() < HEADER_LEN {
        return Err(RagError::corrupt(
            source,
            format!("{} bytes is shorter than the {HEADER_LEN}-byte header", bytes.len()),
        ));
    }

    let count = read_u32(bytes, 0) as usize;
    let dimension = read_u32(bytes, 4) as usize;
    if count == 0 || dimension == 0 {
        return Err(RagError::corrupt(
            source,
            format!("header declares {count} vectors of dimension {dimension}"),
        ));
    }

    let payload = &bytes[HEADER_LEN..];
    let expected = count
        .checked_mul(dimension)
        .and_then(|floats| floats.checked_mul(FLOAT_LEN));
    if expected != Some(payload.len()) {
        return Err(RagError::corrupt(
            source,
            format!(
                "header declares {count}x{dimension} floats but payload has {} bytes",
                payload.len()
            ),
        ));
    }

    let data = payload
        .chunks_exact(FLOAT_LEN)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Ok(FlatIndex::from_raw(dimension, data))
}

impl FlatIndex {
    /// Encodes the index as `{count: u32, dimension: u32}` followed by the row-major matrix, all
    /// little-endian.
    ///
    /// # Errors
    /// [`RagError::InvalidConfiguration`] if the count or dimension does not fit in a `u32`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let header = |value: usize, what: &str| {
            u32::try_from(value).map_err(|_| {
                RagError::InvalidConfiguration(format!(
                    "{what} {value} does not fit the index header"
                ))
            })
        };
        let count = header(self.len(), "vector count")?;
        let dimension = header(self.dimension(), "dimension")?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + self.as_slice().len() * FLOAT_LEN);
        bytes.extend_from_slice(&count.to_le_bytes());
        bytes.extend_from_slice(&dimension.to_le_bytes());
        for value in self.as_slice() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        Ok(bytes)
    }

    /// Decodes an index produced by [`FlatIndex::to_bytes`].
    ///
    /// # Errors
    /// [`RagError::CorruptPersistedState`] if the buffer is shorter than the header, declares zero
    /// vectors or dimensions, or its payload length disagrees with the header.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        decode(bytes, Path::new(IN_MEMORY))
    }

    /// Writes the index to `path`.
    ///
    /// # Errors
    /// [`RagError::Persistence`] on I/O failure.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        super::write_atomic(path.as_ref(), &self.to_bytes()?)
    }

    /// Reads an index from `path`.
    ///
    /// # Errors
    /// [`RagError::Persistence`] on I/O failure, [`RagError::CorruptPersistedState`] on a
    /// malformed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let index = decode(&super::read(path)?, path)?;
        tracing::info!(
            path = %path.display(),
            vectors = index.len(),
            dimension = index.dimension(),
            "loaded flat index"
        );
        Ok(index)
    }
}
