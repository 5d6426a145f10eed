#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runner behind the `merge_quality` binary.
pub mod app;
/// Flattening and re-nesting of attribute trees.
pub mod attributes;
/// Dataset configuration types and YAML loading.
pub mod config;
/// Centralized constants used by both dataset builders.
pub mod constants;
/// Chunk, sample, and message types.
pub mod data;
/// Human-messages dataset builder.
pub mod human_messages;
/// Merge-quality dataset builder.
pub mod merge_quality;
/// Synthetic personal records.
pub mod personal_data;
/// Seeded random number generation.
pub mod rng;
/// Output transports (JSON Lines files today).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use attributes::{AttributeValue, flatten, unflatten};
pub use config::{FieldCountRange, HumanMessagesConfig, MergeQualityConfig};
pub use data::{
    Chunk, ChunkFormat, ChunkOwner, ChunkRow, DatasetSample, HumanMessage, IdentifierType,
    MessageKind, RowOwner,
};
pub use errors::DatagenError;
pub use human_messages::{
    MessageGenerator, PromptedMessageGenerator, build_human_messages_dataset,
    write_human_messages_dataset,
};
pub use merge_quality::{
    SamplePreview, build_merge_quality_dataset, identifier_value, write_merge_quality_dataset,
};
pub use personal_data::{PersonalData, PersonalDataGenerator, RecordGenerator};
pub use rng::DeterministicRng;
pub use types::{AttributeTree, FieldPath, FieldValue, FlatRecord, IdentifierMap, Prompt};
