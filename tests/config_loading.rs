use std::fs;
use std::path::PathBuf;

use slam_datagen::{
    ChunkFormat, DatagenError, FieldCountRange, HumanMessagesConfig, IdentifierType,
    MergeQualityConfig,
};
use tempfile::tempdir;

#[test]
fn merge_quality_yaml_file_overrides_defaults() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("merge_quality.yaml");
    fs::write(
        &path,
        r#"
random_seed: 1337
dataset_size: 10
chunk_formats: [markdown, json]
distractor_chunks_per_format: 2
ground_truth_field_range: [3, 5]
markdown_target_row_probability: 0.75
identifier_types: [email]
output_file: out/mq.jsonl
"#,
    )
    .unwrap();

    let config = MergeQualityConfig::from_yaml_path(&path).unwrap();
    assert_eq!(config.random_seed, 1337);
    assert_eq!(config.dataset_size, 10);
    assert_eq!(
        config.chunk_formats,
        vec![ChunkFormat::Markdown, ChunkFormat::Json]
    );
    assert_eq!(config.distractor_chunks_per_format, 2);
    assert_eq!(
        config.ground_truth_field_range,
        Some(FieldCountRange::Between(3, 5))
    );
    assert_eq!(config.identifier_types, vec![IdentifierType::Email]);
    assert_eq!(config.output_file, PathBuf::from("out/mq.jsonl"));
    assert_eq!(config.markdown_distractor_rows, 3);
}

#[test]
fn empty_yaml_file_yields_defaults() {
    let temp = tempdir().unwrap();
    let path = temp.path().join("empty.yaml");
    fs::write(&path, "").unwrap();
    assert_eq!(
        MergeQualityConfig::from_yaml_path(&path).unwrap(),
        MergeQualityConfig::default()
    );
}

#[test]
fn missing_file_reports_io_error() {
    let temp = tempdir().unwrap();
    let err = MergeQualityConfig::from_yaml_path(temp.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, DatagenError::Io(_)));
}

#[test]
fn invalid_values_are_rejected_at_load_time() {
    let err = MergeQualityConfig::from_yaml_str("markdown_target_row_probability: 2.0").unwrap_err();
    assert!(matches!(err, DatagenError::Configuration(_)));

    let err = MergeQualityConfig::from_yaml_str("identifier_types: [passport]").unwrap_err();
    assert!(matches!(err, DatagenError::ConfigParse(_)));
}

#[test]
fn human_messages_yaml_loads_prompts() {
    let config = HumanMessagesConfig::from_yaml_str(
        r#"
dataset_size: 20
random_fraction: 0.5
random_length_range: [3, 9]
synthetic_batch_size: 4
system_prompt: You write short chat messages.
user_prompts_for_generation:
  - Ask a friend about dinner.
"#,
    )
    .unwrap();
    assert_eq!(config.random_count(), 10);
    assert_eq!(config.length_bounds().unwrap(), (3, 9));
    assert_eq!(config.batch_size().unwrap(), 4);
    assert_eq!(config.user_prompts_for_generation.len(), 1);

    let err = HumanMessagesConfig::from_yaml_str("synthetic_batch_size: 2").unwrap_err();
    assert!(err.to_string().contains("user_prompts_for_generation"));
}
