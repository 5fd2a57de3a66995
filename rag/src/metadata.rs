//! Position-keyed chunk records.

use serde::ser::{Serialize, Serializer};

use crate::error::{RagError, Result};
use crate::types::Chunk;

/// Maps index positions `0..N` back to the chunks that produced them.
///
/// Built once, alongside a [`FlatIndex`](crate::FlatIndex), from the same ordered batch so that
/// position `i` names the same chunk in both. There is no update or delete path.
///
/// Serializes as a JSON object keyed by the decimal position: `{"0": {...}, "1": {...}}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetadataMap {
    records: Vec<Chunk>,
}

impl MetadataMap {
    /// Builds a map assigning each chunk its sequence index as position.
    #[must_use]
    pub const fn build(records: Vec<Chunk>) -> Self {
        Self { records }
    }

    /// Chunks stored at `positions`, in the requested order.
    ///
    /// # Errors
    /// [`RagError::IndexOutOfRange`] if any position is `>= len()`. Nothing is returned in that
    /// case, not even the valid positions.
    pub fn resolve(&self, positions: &[usize]) -> Result<Vec<&Chunk>> {
        positions
            .iter()
            .map(|&position| {
                self.records.get(position).ok_or(RagError::IndexOutOfRange {
                    position,
                    len: self.records.len(),
                })
            })
            .collect()
    }

    /// The chunk at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Chunk> {
        self.records.get(position)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the map holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over records in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.records.iter()
    }

    /// Consumes the map, returning records in position order.
    #[must_use]
    pub fn into_records(self) -> Vec<Chunk> {
        self.records
    }
}

impl FromIterator<Chunk> for MetadataMap {
    fn from_iter<T: IntoIterator<Item = Chunk>>(iter: T) -> Self {
        Self::build(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MetadataMap {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(
            self.records
                .iter()
                .enumerate()
                .map(|(position, chunk)| (position.to_string(), chunk)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> MetadataMap {
        MetadataMap::build(vec![
            Chunk::new("first", 0, 5),
            Chunk::new("second", 5, 11),
            Chunk::new("third", 11, 16),
        ])
    }

    #[test]
    fn resolve_keeps_requested_order() {
        let map = three();
        let texts: Vec<_> = map
            .resolve(&[0, 2])
            .unwrap()
            .into_iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, ["first", "third"]);

        let texts: Vec<_> = map
            .resolve(&[2, 0, 2])
            .unwrap()
            .into_iter()
            .map(|c| c.text.as_str())
            .collect();
        assert_eq!(texts, ["third", "first", "third"]);
    }

    #[test]
    fn out_of_range_position_fails() {
        let map = three();
        assert!(matches!(
            map.resolve(&[3]),
            Err(RagError::IndexOutOfRange { position: 3, len: 3 })
        ));
        assert!(matches!(
            map.resolve(&[0, 1, usize::MAX]),
            Err(RagError::IndexOutOfRange { .. })
        ));
        assert!(map.get(3).is_none());
    }

    #[test]
    fn serializes_with_decimal_keys() {
        let value = serde_json::to_value(three()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["1"]["text"], "second");
        assert_eq!(object["2"]["start_offset"], 11);
    }

    #[test]
    fn collects_from_chunks() {
        let map: MetadataMap = (0..4).map(|i| Chunk::new(i.to_string(), i, i + 1)).collect();
        assert_eq!(map.len(), 4);
        assert_eq!(map.iter().nth(3).unwrap().text, "3");
        assert!(MetadataMap::default().is_empty());
    }
}
