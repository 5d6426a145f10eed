/// Constants used by attribute flattening.
pub mod attributes {
    /// Separator joining nested attribute keys into one flat path (for example `work__company`).
    pub const FIELD_PATH_DELIMITER: &str = "__";
}

/// Constants used by the merge-quality dataset builder.
pub mod merge_quality {
    /// Default RNG seed for dataset synthesis.
    pub const DEFAULT_RANDOM_SEED: u64 = 42;
    /// Default number of identities (samples) to synthesize.
    pub const DEFAULT_DATASET_SIZE: usize = 100;
    /// Default number of JSON/XML distractor rows per format and identity.
    pub const DEFAULT_DISTRACTOR_CHUNKS_PER_FORMAT: usize = 1;
    /// Default number of distractor rows in every markdown table.
    pub const DEFAULT_MARKDOWN_DISTRACTOR_ROWS: usize = 3;
    /// Default number of markdown tables per identity.
    pub const DEFAULT_MARKDOWN_CHUNKS_PER_PERSON: usize = 1;
    /// Default probability that a markdown table carries the target row.
    pub const DEFAULT_MARKDOWN_TARGET_ROW_PROBABILITY: f64 = 0.5;
    /// Default output path for the merge-quality dataset.
    pub const DEFAULT_OUTPUT_FILE: &str = "data/merge_quality.jsonl";
    /// Attribute path holding the email used by the `email` identifier type.
    pub const EMAIL_FIELD_PATH: &str = "contacts__email";
    /// Root element of every XML chunk.
    pub const XML_ROOT_TAG: &str = "record";
    /// Indentation unit for nested XML elements.
    pub const XML_INDENT: &str = "  ";
    /// Cell text of the markdown separator row.
    pub const MARKDOWN_SEPARATOR_CELL: &str = "---";
}

/// Constants used by the human-messages dataset builder.
pub mod human_messages {
    /// Alphabet used for random (non-message) entries.
    pub const VALID_RANDOM_CHARACTERS: &[u8] =
        b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    /// Default share of random entries in the dataset.
    pub const DEFAULT_RANDOM_FRACTION: f64 = 0.25;
    /// Default inclusive length bounds of random entries.
    pub const DEFAULT_RANDOM_LENGTH_RANGE: [i64; 2] = [5, 40];
    /// Default number of messages requested from the generator per call.
    pub const DEFAULT_SYNTHETIC_BATCH_SIZE: usize = 10;
    /// Default output path for the human-messages dataset.
    pub const DEFAULT_OUTPUT_FILE: &str = "data/human_messages.jsonl";
    /// Separator between the user prompt and the batch instruction.
    pub const PROMPT_INSTRUCTION_SEPARATOR: &str = "\n\n";
}
