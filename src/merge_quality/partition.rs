use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::data::ChunkFormat;
use crate::types::FlatRecord;

/// Assign every field to exactly one format.
///
/// Keys are shuffled and dealt round-robin across `formats`, so bucket sizes
/// differ by at most one. Every format is present in the result, possibly
/// empty. No draw is made for an empty input.
pub fn partition_fields<R: Rng + ?Sized>(
    fields: &FlatRecord,
    formats: &[ChunkFormat],
    rng: &mut R,
) -> IndexMap<ChunkFormat, FlatRecord> {
    let mut partitions: IndexMap<ChunkFormat, FlatRecord> = formats
        .iter()
        .map(|format| (*format, FlatRecord::new()))
        .collect();
    if fields.is_empty() || formats.is_empty() {
        return partitions;
    }

    let mut keys: Vec<&String> = fields.keys().collect();
    keys.shuffle(rng);
    for (idx, key) in keys.into_iter().enumerate() {
        let format = formats[idx % formats.len()];
        if let Some(bucket) = partitions.get_mut(&format) {
            bucket.insert(key.clone(), fields[key].clone());
        }
    }
    partitions
}
