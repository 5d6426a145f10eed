use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DatagenError;
use crate::personal_data::PersonalData;
use crate::types::{FlatRecord, IdentifierMap};

/// Document format a chunk is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ChunkFormat {
    /// Indented JSON object, one row per chunk.
    Json,
    /// `<record>` element tree, one row per chunk.
    Xml,
    /// Pipe-delimited table, several rows per chunk.
    Markdown,
}

impl ChunkFormat {
    /// Every recognised format, in canonical order.
    pub const ALL: [ChunkFormat; 3] = [ChunkFormat::Json, ChunkFormat::Xml, ChunkFormat::Markdown];

    /// Lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ChunkFormat::Json => "json",
            ChunkFormat::Xml => "xml",
            ChunkFormat::Markdown => "markdown",
        }
    }
}

impl fmt::Display for ChunkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkFormat {
    type Err = DatagenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ChunkFormat::ALL
            .into_iter()
            .find(|format| format.as_str() == raw)
            .ok_or_else(|| DatagenError::UnsupportedFormat(raw.to_string()))
    }
}

impl TryFrom<String> for ChunkFormat {
    type Error = DatagenError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Which unique identifier tags the rows of a chunk group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierType {
    /// Full name from `unique_identifiers`.
    Name,
    /// Social security number from `unique_identifiers`.
    Ssn,
    /// Contact email, read from the `contacts__email` attribute.
    Email,
}

impl IdentifierType {
    /// Identifier types drawn from when none are configured.
    pub const DEFAULTS: [IdentifierType; 2] = [IdentifierType::Name, IdentifierType::Ssn];

    /// Column / key name used when the identifier is rendered.
    pub const fn as_str(&self) -> &'static str {
        match self {
            IdentifierType::Name => "name",
            IdentifierType::Ssn => "ssn",
            IdentifierType::Email => "email",
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of a single row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowOwner {
    /// The identity under test.
    Target,
    /// An unrelated decoy identity.
    Distractor,
}

/// Owner of a rendered chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkOwner {
    /// Every row belongs to the target.
    Target,
    /// Every row belongs to distractors.
    Distractor,
    /// Markdown table mixing target and distractor rows.
    Mixed,
}

impl RowOwner {
    /// Lowercase wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RowOwner::Target => "target",
            RowOwner::Distractor => "distractor",
        }
    }
}

impl From<RowOwner> for ChunkOwner {
    fn from(owner: RowOwner) -> Self {
        match owner {
            RowOwner::Target => ChunkOwner::Target,
            RowOwner::Distractor => ChunkOwner::Distractor,
        }
    }
}

/// One identity's contribution to one chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRow {
    /// Identifier used to tag this row.
    pub identifier_type: IdentifierType,
    /// Identifier value; may be empty when the identity lacks it.
    pub identifier_value: String,
    /// Whether the row belongs to the target.
    pub owner_id: RowOwner,
    /// Flat fields visible in this row.
    pub fields: FlatRecord,
}

/// Self-contained rendered fragment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Format `content` is rendered in.
    pub format: ChunkFormat,
    /// Whose rows the chunk holds.
    pub owner_id: ChunkOwner,
    /// Raw rendered JSON / XML / Markdown text.
    pub content: String,
}

/// One training example of the merge-quality task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSample {
    /// Sparsified identity the merge must recover.
    pub ground_truth: PersonalData,
    /// Full, un-sparsified identifiers used as the query key.
    pub provided_identifiers: IdentifierMap,
    /// Shuffled chunks (no positional signal).
    pub chunks: Vec<Chunk>,
}

impl DatasetSample {
    /// Serialize as one compact JSON line (without the trailing newline).
    pub fn to_json_line(&self) -> Result<String, DatagenError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Origin of a human-messages entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Random alphanumeric noise.
    Random,
    /// Text produced by a message generator.
    Synthetic,
}

/// One entry of the human-messages dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanMessage {
    /// Message text.
    pub text: String,
    /// Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_format_parses_known_names_only() {
        assert_eq!("json".parse::<ChunkFormat>().unwrap(), ChunkFormat::Json);
        assert_eq!("markdown".parse::<ChunkFormat>().unwrap(), ChunkFormat::Markdown);
        let err = "csv".parse::<ChunkFormat>().unwrap_err();
        assert!(matches!(err, DatagenError::UnsupportedFormat(name) if name == "csv"));
    }

    #[test]
    fn chunk_serializes_lowercase_tags() {
        let chunk = Chunk {
            format: ChunkFormat::Xml,
            owner_id: ChunkOwner::Mixed,
            content: "<record>\n</record>".into(),
        };
        let json = serde_json::to_string(&chunk).unwrap();
        assert_eq!(
            json,
            r#"{"format":"xml","owner_id":"mixed","content":"<record>\n</record>"}"#
        );
        let parsed: Chunk = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, chunk);
    }

    #[test]
    fn unknown_format_fails_deserialization() {
        let err = serde_json::from_str::<ChunkFormat>(r#""yaml""#).unwrap_err();
        assert!(err.to_string().contains("unsupported chunk format 'yaml'"));
    }

    #[test]
    fn human_message_uses_type_key() {
        let message = HumanMessage {
            text: "hey".into(),
            kind: MessageKind::Synthetic,
        };
        assert_eq!(
            serde_json::to_string(&message).unwrap(),
            r#"{"text":"hey","type":"synthetic"}"#
        );
    }

    #[test]
    fn row_owner_maps_onto_chunk_owner() {
        assert_eq!(ChunkOwner::from(RowOwner::Target), ChunkOwner::Target);
        assert_eq!(ChunkOwner::from(RowOwner::Distractor), ChunkOwner::Distractor);
        assert_eq!(RowOwner::Distractor.as_str(), "distractor");
    }
}
