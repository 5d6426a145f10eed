//! Merge-quality dataset synthesis.
//!
//! For every target identity the assembler sparsifies its attributes into a
//! ground truth, partitions that ground truth across the configured chunk
//! formats, renders each partition next to distractor rows drawn from
//! unrelated identities, and shuffles the resulting chunks.
//!
//! Draw order per identity is fixed: sparsify, partition, then per format an
//! identifier type followed by that format's row draws, then the final chunk
//! shuffle. Changing that order changes every downstream sample for a seed.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::MergeQualityConfig;
use crate::constants::merge_quality::EMAIL_FIELD_PATH;
use crate::data::{Chunk, ChunkFormat, ChunkRow, DatasetSample, IdentifierType, RowOwner};
use crate::errors::DatagenError;
use crate::personal_data::{PersonalData, RecordGenerator};
use crate::rng::DeterministicRng;
use crate::transport::fs::write_jsonl;
use crate::types::{FlatRecord, IdentifierMap};

/// Field partitioning across formats.
pub mod partition;
/// JSON / XML / Markdown chunk renderers.
pub mod render;
/// Ground-truth field selection.
pub mod sparsify;

use partition::partition_fields;
use render::{build_json_chunk, build_markdown_chunk, build_xml_chunk};
use sparsify::sparsify_record;

/// Identifier keys copied into `provided_identifiers`.
const PROVIDED_IDENTIFIER_KEYS: [&str; 2] = ["name", "ssn"];

/// Build one sample per record drawn from `generator`.
///
/// The config is validated first; all randomness comes from one
/// [`DeterministicRng`] seeded with `config.random_seed`.
pub fn build_merge_quality_dataset<G>(
    generator: &mut G,
    config: &MergeQualityConfig,
) -> Result<Vec<DatasetSample>, DatagenError>
where
    G: RecordGenerator + ?Sized,
{
    config.validate()?;
    let mut rng = DeterministicRng::new(config.random_seed);
    let records = generator.generate(config.dataset_size);
    info!(
        "[slam_datagen:merge_quality] building {} samples across formats {:?}",
        records.len(),
        config.chunk_formats
    );

    let mut assembler = SampleAssembler {
        generator,
        config,
        rng: &mut rng,
    };
    let mut samples = Vec::with_capacity(records.len());
    for record in &records {
        samples.push(assembler.build_sample(record)?);
    }

    let chunk_total: usize = samples.iter().map(|sample| sample.chunks.len()).sum();
    info!(
        "[slam_datagen:merge_quality] built {} samples with {} chunks",
        samples.len(),
        chunk_total
    );
    Ok(samples)
}

/// Write samples as JSON lines, creating parent directories as needed.
pub fn write_merge_quality_dataset(
    samples: &[DatasetSample],
    output_file: impl AsRef<Path>,
) -> Result<PathBuf, DatagenError> {
    write_jsonl(samples, output_file)
}

/// Short human-readable summary of one sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SamplePreview {
    /// Provided `name` identifier.
    pub name: String,
    /// Provided `ssn` identifier.
    pub ssn: String,
    /// Chunk count per format, in first-seen order.
    pub chunk_counts: IndexMap<ChunkFormat, usize>,
}

impl SamplePreview {
    /// Summarize `sample`.
    pub fn from_sample(sample: &DatasetSample) -> Self {
        let identifier = |key: &str| {
            sample
                .provided_identifiers
                .get(key)
                .cloned()
                .unwrap_or_default()
        };
        let mut chunk_counts = IndexMap::new();
        for chunk in &sample.chunks {
            *chunk_counts.entry(chunk.format).or_insert(0) += 1;
        }
        Self {
            name: identifier("name"),
            ssn: identifier("ssn"),
            chunk_counts,
        }
    }
}

/// Per-run state threaded through every identity.
struct SampleAssembler<'a, G: RecordGenerator + ?Sized, R: Rng + ?Sized> {
    generator: &'a mut G,
    config: &'a MergeQualityConfig,
    rng: &'a mut R,
}

impl<G: RecordGenerator + ?Sized, R: Rng + ?Sized> SampleAssembler<'_, G, R> {
    fn build_sample(&mut self, record: &PersonalData) -> Result<DatasetSample, DatagenError> {
        let (ground_truth, flat_fields) =
            sparsify_record(record, self.config.ground_truth_field_range, self.rng);
        let provided_identifiers: IdentifierMap = PROVIDED_IDENTIFIER_KEYS
            .iter()
            .map(|key| {
                let value = record
                    .unique_identifiers
                    .get(*key)
                    .cloned()
                    .unwrap_or_default();
                (key.to_string(), value)
            })
            .collect();

        let chunks = self.build_chunks(record, &flat_fields)?;
        debug!(
            "[slam_datagen:merge_quality] sample '{}': {} ground-truth fields, {} chunks",
            provided_identifiers["name"],
            flat_fields.len(),
            chunks.len()
        );
        Ok(DatasetSample {
            ground_truth,
            provided_identifiers,
            chunks,
        })
    }

    fn build_chunks(
        &mut self,
        record: &PersonalData,
        flat_fields: &FlatRecord,
    ) -> Result<Vec<Chunk>, DatagenError> {
        let config = self.config;
        let formats = &config.chunk_formats;
        let mut target_partitions = partition_fields(flat_fields, formats, self.rng);
        let mut chunks = Vec::new();

        for format in formats {
            let identifier_type = self.draw_identifier_type();
            let identifier_value = identifier_value(identifier_type, record);
            let target_fields = target_partitions.swap_remove(format).unwrap_or_default();

            match format {
                ChunkFormat::Markdown => chunks.extend(self.build_markdown_chunks(
                    identifier_type,
                    target_fields,
                    identifier_value,
                )),
                ChunkFormat::Json | ChunkFormat::Xml => {
                    let rows = self.single_row_chunk_rows(
                        *format,
                        identifier_type,
                        target_fields,
                        identifier_value,
                    );
                    for row in &rows {
                        chunks.push(match format {
                            ChunkFormat::Json => build_json_chunk(row)?,
                            _ => build_xml_chunk(row),
                        });
                    }
                }
            }
        }

        chunks.shuffle(self.rng);
        Ok(chunks)
    }

    fn draw_identifier_type(&mut self) -> IdentifierType {
        let types = &self.config.identifier_types;
        types[self.rng.random_range(0..types.len())]
    }

    /// Target row (when it has fields) plus distractor rows for a JSON/XML format.
    fn single_row_chunk_rows(
        &mut self,
        format: ChunkFormat,
        identifier_type: IdentifierType,
        target_fields: FlatRecord,
        target_identifier_value: String,
    ) -> Vec<ChunkRow> {
        let mut rows = Vec::new();
        if !target_fields.is_empty() {
            rows.push(ChunkRow {
                identifier_type,
                identifier_value: target_identifier_value,
                owner_id: RowOwner::Target,
                fields: target_fields,
            });
        }

        let distractors = self
            .generator
            .generate(self.config.distractor_chunks_per_format);
        for distractor in &distractors {
            let (_, distractor_fields) =
                sparsify_record(distractor, self.config.ground_truth_field_range, self.rng);
            let mut partition = partition_fields(&distractor_fields, &[format], self.rng);
            rows.push(ChunkRow {
                identifier_type,
                identifier_value: identifier_value(identifier_type, distractor),
                owner_id: RowOwner::Distractor,
                fields: partition.swap_remove(&format).unwrap_or_default(),
            });
        }
        rows
    }

    /// Markdown tables for one identity.
    ///
    /// The target row joins each table with the configured probability; if
    /// no earlier table drew it, the last table carries it so every target
    /// field stays recoverable. Dropping that fallback would let the target
    /// row vanish for `p < 1` and would shift every seeded sample.
    fn build_markdown_chunks(
        &mut self,
        identifier_type: IdentifierType,
        target_fields: FlatRecord,
        target_identifier_value: String,
    ) -> Vec<Chunk> {
        let chunk_count = self.config.markdown_chunks_per_person.max(1);
        let probability = self.config.markdown_target_row_probability;
        let mut target_placed = false;
        let mut chunks = Vec::with_capacity(chunk_count);

        for chunk_idx in 0..chunk_count {
            let mut rows = Vec::new();
            if !target_fields.is_empty() {
                let drawn = self.rng.random::<f64>() < probability;
                let is_last = chunk_idx + 1 == chunk_count;
                if drawn || (is_last && !target_placed) {
                    target_placed = true;
                    rows.push(ChunkRow {
                        identifier_type,
                        identifier_value: target_identifier_value.clone(),
                        owner_id: RowOwner::Target,
                        fields: target_fields.clone(),
                    });
                }
            }

            rows.extend(self.markdown_distractor_rows(identifier_type));
            if !rows.is_empty() {
                chunks.push(build_markdown_chunk(&rows, identifier_type));
            }
        }
        chunks
    }

    fn markdown_distractor_rows(&mut self, identifier_type: IdentifierType) -> Vec<ChunkRow> {
        let personas = self
            .generator
            .generate(self.config.markdown_distractor_rows);
        personas
            .iter()
            .map(|persona| {
                let (_, mut fields) =
                    sparsify_record(persona, self.config.ground_truth_field_range, self.rng);
                let identifier_value = identifier_value(identifier_type, persona);
                if !identifier_value.is_empty() {
                    fields
                        .entry(identifier_type.as_str().to_string())
                        .or_insert_with(|| identifier_value.clone());
                }
                ChunkRow {
                    identifier_type,
                    identifier_value,
                    owner_id: RowOwner::Distractor,
                    fields,
                }
            })
            .collect()
    }
}

/// Value of `identifier_type` for `record`, or empty when the record lacks it.
pub fn identifier_value(identifier_type: IdentifierType, record: &PersonalData) -> String {
    if let Some(value) = record.unique_identifiers.get(identifier_type.as_str()) {
        return value.clone();
    }
    match identifier_type {
        IdentifierType::Email => crate::attributes::flatten(&record.attributes)
            .swap_remove(EMAIL_FIELD_PATH)
            .unwrap_or_default(),
        IdentifierType::Name | IdentifierType::Ssn => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldCountRange;
    use crate::data::ChunkOwner;
    use crate::personal_data::PersonalDataGenerator;
    use crate::types::AttributeTree;

    fn config(formats: Vec<ChunkFormat>) -> MergeQualityConfig {
        MergeQualityConfig {
            random_seed: 5,
            dataset_size: 4,
            chunk_formats: formats,
            distractor_chunks_per_format: 2,
            ground_truth_field_range: Some(FieldCountRange::Between(3, 6)),
            markdown_distractor_rows: 2,
            ..MergeQualityConfig::default()
        }
    }

    #[test]
    fn json_and_xml_emit_one_chunk_per_row() {
        let mut generator = PersonalDataGenerator::new(5);
        let samples = build_merge_quality_dataset(
            &mut generator,
            &config(vec![ChunkFormat::Json, ChunkFormat::Xml]),
        )
        .unwrap();
        assert_eq!(samples.len(), 4);
        for sample in samples {
            for format in [ChunkFormat::Json, ChunkFormat::Xml] {
                let of_format: Vec<_> = sample
                    .chunks
                    .iter()
                    .filter(|chunk| chunk.format == format)
                    .collect();
                assert_eq!(of_format.len(), 3);
                assert_eq!(
                    of_format
                        .iter()
                        .filter(|chunk| chunk.owner_id == ChunkOwner::Target)
                        .count(),
                    1
                );
            }
        }
    }

    #[test]
    fn markdown_tables_always_surface_the_target_once_per_identity() {
        let mut generator = PersonalDataGenerator::new(8);
        let config = MergeQualityConfig {
            markdown_target_row_probability: 0.0,
            markdown_chunks_per_person: 3,
            ..config(vec![ChunkFormat::Markdown])
        };
        let samples = build_merge_quality_dataset(&mut generator, &config).unwrap();
        for sample in samples {
            assert_eq!(sample.chunks.len(), 3);
            let with_target = sample
                .chunks
                .iter()
                .filter(|chunk| chunk.owner_id != ChunkOwner::Distractor)
                .count();
            assert_eq!(with_target, 1);
        }
    }

    #[test]
    fn markdown_without_distractors_renders_target_only_tables() {
        let mut generator = PersonalDataGenerator::new(8);
        let config = MergeQualityConfig {
            markdown_distractor_rows: 0,
            ..config(vec![ChunkFormat::Json, ChunkFormat::Markdown])
        };
        let samples = build_merge_quality_dataset(&mut generator, &config).unwrap();
        for sample in samples {
            let markdown: Vec<_> = sample
                .chunks
                .iter()
                .filter(|chunk| chunk.format == ChunkFormat::Markdown)
                .collect();
            // Three or more ground-truth fields always leave the markdown partition non-empty.
            assert_eq!(markdown.len(), 1);
            assert_eq!(markdown[0].owner_id, ChunkOwner::Target);
        }
    }

    #[test]
    fn provided_identifiers_are_not_sparsified() {
        let mut generator = PersonalDataGenerator::new(13);
        let reference = PersonalDataGenerator::new(13).generate(4);
        let samples = build_merge_quality_dataset(
            &mut generator,
            &config(vec![ChunkFormat::Json]),
        )
        .unwrap();
        for (sample, record) in samples.iter().zip(&reference) {
            assert_eq!(sample.provided_identifiers, record.unique_identifiers);
            assert_eq!(
                sample.ground_truth.unique_identifiers,
                record.unique_identifiers
            );
        }
    }

    #[test]
    fn invalid_config_fails_before_generation() {
        let mut generator = PersonalDataGenerator::new(1);
        let err = build_merge_quality_dataset(&mut generator, &config(Vec::new())).unwrap_err();
        assert!(matches!(err, DatagenError::Configuration(_)));
    }

    #[test]
    fn email_identifier_reads_contact_attribute() {
        let record = PersonalDataGenerator::new(2).generate(1).remove(0);
        let email = identifier_value(IdentifierType::Email, &record);
        assert!(email.contains('@'));
        assert_eq!(
            identifier_value(IdentifierType::Name, &record),
            record.unique_identifiers["name"]
        );

        let bare = PersonalData {
            unique_identifiers: IdentifierMap::new(),
            attributes: AttributeTree::new(),
        };
        assert_eq!(identifier_value(IdentifierType::Email, &bare), "");
        assert_eq!(identifier_value(IdentifierType::Ssn, &bare), "");
    }

    #[test]
    fn preview_counts_chunks_per_format() {
        let mut generator = PersonalDataGenerator::new(4);
        let samples = build_merge_quality_dataset(
            &mut generator,
            &config(vec![ChunkFormat::Json, ChunkFormat::Xml]),
        )
        .unwrap();
        let preview = SamplePreview::from_sample(&samples[0]);
        assert_eq!(preview.name, samples[0].provided_identifiers["name"]);
        assert_eq!(preview.chunk_counts[&ChunkFormat::Json], 3);
        assert_eq!(preview.chunk_counts[&ChunkFormat::Xml], 3);
    }
}
