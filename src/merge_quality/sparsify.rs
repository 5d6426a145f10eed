use rand::Rng;
use rand::seq::SliceRandom;

use crate::attributes::{flatten, unflatten};
use crate::config::FieldCountRange;
use crate::personal_data::PersonalData;
use crate::types::FlatRecord;

/// Draw how many of `available` fields to keep.
///
/// Bounds are clamped to `[1, available]`; no draw is made when nothing is
/// available. `None` keeps every field.
pub fn sample_field_count<R: Rng + ?Sized>(
    range: Option<FieldCountRange>,
    available: usize,
    rng: &mut R,
) -> usize {
    if available == 0 {
        return 0;
    }
    let available_i64 = available as i64;
    let (min_fields, max_fields) = range
        .map(|range| range.bounds())
        .unwrap_or((available_i64, available_i64));
    let lower = min_fields.min(available_i64).max(1);
    let upper = max_fields.min(available_i64).max(lower);
    rng.random_range(lower..=upper) as usize
}

/// Keep a random subset of a record's attributes as its ground truth.
///
/// Returns the sparse record (same identifiers, re-nested attributes) and the
/// selected flat fields in selection order.
pub fn sparsify_record<R: Rng + ?Sized>(
    record: &PersonalData,
    range: Option<FieldCountRange>,
    rng: &mut R,
) -> (PersonalData, FlatRecord) {
    let flat_attrs = flatten(&record.attributes);
    if flat_attrs.is_empty() {
        return (record.clone(), FlatRecord::new());
    }

    let keep = sample_field_count(range, flat_attrs.len(), rng);
    let mut keys: Vec<&String> = flat_attrs.keys().collect();
    keys.shuffle(rng);
    let sparse_flat: FlatRecord = keys
        .into_iter()
        .take(keep)
        .map(|key| (key.clone(), flat_attrs[key].clone()))
        .collect();

    let sparse_record = PersonalData {
        unique_identifiers: record.unique_identifiers.clone(),
        attributes: unflatten(&sparse_flat),
    };
    (sparse_record, sparse_flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::personal_data::{PersonalDataGenerator, RecordGenerator};
    use crate::rng::DeterministicRng;
    use crate::types::AttributeTree;

    #[test]
    fn field_count_respects_configured_bounds() {
        let mut rng = DeterministicRng::new(3);
        for _ in 0..200 {
            let count = sample_field_count(Some(FieldCountRange::Between(3, 5)), 30, &mut rng);
            assert!((3..=5).contains(&count));
        }
    }

    #[test]
    fn field_count_clamps_to_available() {
        let mut rng = DeterministicRng::new(4);
        assert_eq!(
            sample_field_count(Some(FieldCountRange::Between(10, 20)), 4, &mut rng),
            4
        );
        assert_eq!(
            sample_field_count(Some(FieldCountRange::Fixed(0)), 4, &mut rng),
            1
        );
        assert_eq!(
            sample_field_count(Some(FieldCountRange::Between(-3, -1)), 4, &mut rng),
            1
        );
        assert_eq!(sample_field_count(None, 7, &mut rng), 7);
        assert_eq!(
            sample_field_count(Some(FieldCountRange::Fixed(5)), 0, &mut rng),
            0
        );
    }

    #[test]
    fn empty_availability_consumes_no_draws() {
        let mut rng = DeterministicRng::new(9);
        let before = rng.state();
        sample_field_count(Some(FieldCountRange::Fixed(3)), 0, &mut rng);
        assert_eq!(rng.state(), before);
    }

    #[test]
    fn sparsified_fields_are_a_subset_of_the_record() {
        let record = PersonalDataGenerator::new(21).generate(1).remove(0);
        let full = flatten(&record.attributes);
        let mut rng = DeterministicRng::new(5);
        let (sparse, fields) =
            sparsify_record(&record, Some(FieldCountRange::Between(3, 5)), &mut rng);

        assert!((3..=5).contains(&fields.len()));
        for (key, value) in &fields {
            assert_eq!(full.get(key), Some(value));
        }
        assert_eq!(flatten(&sparse.attributes), fields);
        assert_eq!(sparse.unique_identifiers, record.unique_identifiers);
    }

    #[test]
    fn record_without_attributes_yields_empty_ground_truth() {
        let mut record = PersonalDataGenerator::new(2).generate(1).remove(0);
        record.attributes = AttributeTree::new();
        let mut rng = DeterministicRng::new(1);
        let (sparse, fields) = sparsify_record(&record, Some(FieldCountRange::Fixed(3)), &mut rng);
        assert!(fields.is_empty());
        assert_eq!(sparse, record);
    }
}
