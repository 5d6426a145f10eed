use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::human_messages::{
    DEFAULT_OUTPUT_FILE as DEFAULT_HUMAN_MESSAGES_OUTPUT, DEFAULT_RANDOM_FRACTION,
    DEFAULT_RANDOM_LENGTH_RANGE, DEFAULT_SYNTHETIC_BATCH_SIZE,
};
use crate::constants::merge_quality::{
    DEFAULT_DATASET_SIZE, DEFAULT_DISTRACTOR_CHUNKS_PER_FORMAT,
    DEFAULT_MARKDOWN_CHUNKS_PER_PERSON, DEFAULT_MARKDOWN_DISTRACTOR_ROWS,
    DEFAULT_MARKDOWN_TARGET_ROW_PROBABILITY, DEFAULT_OUTPUT_FILE, DEFAULT_RANDOM_SEED,
};
use crate::data::{ChunkFormat, IdentifierType};
use crate::errors::DatagenError;
use crate::types::Prompt;

/// How many ground-truth fields to keep per identity.
///
/// Accepts either a single integer or a two-element `[min, max]` list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldCountRange {
    /// Keep exactly this many fields (clamped to what is available).
    Fixed(i64),
    /// Keep a uniformly drawn count in `[min, max]` (clamped to what is available).
    Between(i64, i64),
}

impl FieldCountRange {
    /// Configured `(min, max)` bounds before clamping.
    pub fn bounds(&self) -> (i64, i64) {
        match *self {
            FieldCountRange::Fixed(count) => (count, count),
            FieldCountRange::Between(min, max) => (min, max),
        }
    }
}

/// Top-level configuration of the merge-quality dataset builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeQualityConfig {
    /// RNG seed that fixes every draw of the pipeline.
    pub random_seed: u64,
    /// Number of target identities (one sample each).
    pub dataset_size: usize,
    /// Ordered formats the ground-truth fields are partitioned across.
    pub chunk_formats: Vec<ChunkFormat>,
    /// Distractor rows (one chunk each) per JSON/XML format and identity.
    #[serde(deserialize_with = "deserialize_count")]
    pub distractor_chunks_per_format: usize,
    /// Ground-truth field count; `None` keeps every available field.
    pub ground_truth_field_range: Option<FieldCountRange>,
    /// Distractor rows added to each markdown table.
    #[serde(deserialize_with = "deserialize_count")]
    pub markdown_distractor_rows: usize,
    /// Markdown tables built per identity (at least one is always built).
    #[serde(deserialize_with = "deserialize_count")]
    pub markdown_chunks_per_person: usize,
    /// Probability that a markdown table carries the target row.
    pub markdown_target_row_probability: f64,
    /// Identifier types a chunk group may be tagged with.
    pub identifier_types: Vec<IdentifierType>,
    /// Destination of the JSONL dataset.
    pub output_file: PathBuf,
    /// Number of samples summarized on stdout after writing.
    #[serde(deserialize_with = "deserialize_count")]
    pub preview_samples: usize,
}

impl Default for MergeQualityConfig {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            dataset_size: DEFAULT_DATASET_SIZE,
            chunk_formats: ChunkFormat::ALL.to_vec(),
            distractor_chunks_per_format: DEFAULT_DISTRACTOR_CHUNKS_PER_FORMAT,
            ground_truth_field_range: None,
            markdown_distractor_rows: DEFAULT_MARKDOWN_DISTRACTOR_ROWS,
            markdown_chunks_per_person: DEFAULT_MARKDOWN_CHUNKS_PER_PERSON,
            markdown_target_row_probability: DEFAULT_MARKDOWN_TARGET_ROW_PROBABILITY,
            identifier_types: IdentifierType::DEFAULTS.to_vec(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            preview_samples: 0,
        }
    }
}

impl MergeQualityConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(raw: &str) -> Result<Self, DatagenError> {
        let config: Self = parse_yaml(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, DatagenError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Reject settings that cannot produce a dataset.
    pub fn validate(&self) -> Result<(), DatagenError> {
        if self.dataset_size == 0 {
            return Err(config_error("dataset_size must be positive"));
        }
        if self.chunk_formats.is_empty() {
            return Err(config_error("chunk_formats must contain at least one format"));
        }
        if self.identifier_types.is_empty() {
            return Err(config_error(
                "identifier_types must contain at least one identifier type",
            ));
        }
        if !(0.0..=1.0).contains(&self.markdown_target_row_probability) {
            return Err(config_error(
                "markdown_target_row_probability must be within [0, 1]",
            ));
        }
        Ok(())
    }
}

/// Configuration of the human-messages dataset builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HumanMessagesConfig {
    /// RNG seed for random entries, prompt choice, and the final shuffle.
    pub random_seed: u64,
    /// Exact number of entries in the output.
    pub dataset_size: usize,
    /// Share of entries that are random alphanumeric strings.
    pub random_fraction: f64,
    /// Inclusive `[min, max]` length of random entries.
    pub random_length_range: Vec<i64>,
    /// Messages requested from the generator per call.
    pub synthetic_batch_size: i64,
    /// System prompt handed to the message backend.
    pub system_prompt: Prompt,
    /// User prompts; one is chosen uniformly for each batch.
    pub user_prompts_for_generation: Vec<Prompt>,
    /// Destination of the JSONL dataset.
    pub output_file: PathBuf,
    /// Number of entries echoed on stdout after writing.
    #[serde(deserialize_with = "deserialize_count")]
    pub preview_samples: usize,
}

impl Default for HumanMessagesConfig {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            dataset_size: DEFAULT_DATASET_SIZE,
            random_fraction: DEFAULT_RANDOM_FRACTION,
            random_length_range: DEFAULT_RANDOM_LENGTH_RANGE.to_vec(),
            synthetic_batch_size: DEFAULT_SYNTHETIC_BATCH_SIZE as i64,
            system_prompt: String::new(),
            user_prompts_for_generation: Vec::new(),
            output_file: PathBuf::from(DEFAULT_HUMAN_MESSAGES_OUTPUT),
            preview_samples: 0,
        }
    }
}

impl HumanMessagesConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml_str(raw: &str) -> Result<Self, DatagenError> {
        let config: Self = parse_yaml(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a YAML file.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self, DatagenError> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Number of random entries: `floor(dataset_size * random_fraction)`.
    pub fn random_count(&self) -> usize {
        (self.dataset_size as f64 * self.random_fraction).floor() as usize
    }

    /// Validated `(min, max)` length bounds for random entries.
    pub fn length_bounds(&self) -> Result<(usize, usize), DatagenError> {
        let &[min_len, max_len] = self.random_length_range.as_slice() else {
            return Err(config_error("random_length_range must be a two-element list"));
        };
        if min_len <= 0 || max_len < min_len {
            return Err(config_error(
                "random_length_range must contain positive ascending values",
            ));
        }
        Ok((min_len as usize, max_len as usize))
    }

    /// Validated synthetic batch size.
    pub fn batch_size(&self) -> Result<usize, DatagenError> {
        if self.synthetic_batch_size <= 0 {
            return Err(config_error("synthetic_batch_size must be positive"));
        }
        Ok(self.synthetic_batch_size as usize)
    }

    /// Reject settings that cannot produce a dataset.
    pub fn validate(&self) -> Result<(), DatagenError> {
        self.batch_size()?;
        if self.user_prompts_for_generation.is_empty() {
            return Err(config_error(
                "user_prompts_for_generation must contain at least one prompt",
            ));
        }
        if !(0.0..=1.0).contains(&self.random_fraction) {
            return Err(config_error("random_fraction must be within [0, 1]"));
        }
        if self.random_count() > 0 {
            self.length_bounds()?;
        }
        Ok(())
    }
}

fn parse_yaml<T: DeserializeOwned>(raw: &str) -> Result<T, DatagenError> {
    if raw.trim().is_empty() {
        return Ok(serde_yaml::from_str("{}")?);
    }
    Ok(serde_yaml::from_str(raw)?)
}

fn config_error(message: &str) -> DatagenError {
    DatagenError::Configuration(message.to_string())
}

/// Accept any integer and clamp negatives to zero.
fn deserialize_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.max(0) as usize)
}
