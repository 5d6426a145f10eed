//! Format-specific chunk renderers.
//!
//! Every renderer sees a row through [`row_fields_with_identifier`]: the
//! row's fields plus its identifier, which never overwrites an existing
//! field of the same name.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::attributes::{AttributeValue, unflatten};
use crate::constants::merge_quality::{MARKDOWN_SEPARATOR_CELL, XML_INDENT, XML_ROOT_TAG};
use crate::data::{Chunk, ChunkFormat, ChunkOwner, ChunkRow, IdentifierType, RowOwner};
use crate::errors::DatagenError;
use crate::types::{AttributeTree, FlatRecord};

/// A row's renderable fields: its own fields plus the identifier, if any.
pub fn row_fields_with_identifier(row: &ChunkRow) -> FlatRecord {
    let mut fields = row.fields.clone();
    if !row.identifier_value.is_empty() {
        fields
            .entry(row.identifier_type.as_str().to_string())
            .or_insert_with(|| row.identifier_value.clone());
    }
    fields
}

#[derive(Serialize)]
struct JsonChunkPayload<'a> {
    owner: &'static str,
    identifier_type: IdentifierType,
    identifier_value: &'a str,
    data: AttributeTree,
}

/// Render one row as an indented JSON object.
pub fn build_json_chunk(row: &ChunkRow) -> Result<Chunk, DatagenError> {
    let payload = JsonChunkPayload {
        owner: row.owner_id.as_str(),
        identifier_type: row.identifier_type,
        identifier_value: &row.identifier_value,
        data: unflatten(&row_fields_with_identifier(row)),
    };
    Ok(Chunk {
        format: ChunkFormat::Json,
        owner_id: row.owner_id.into(),
        content: serde_json::to_string_pretty(&payload)?,
    })
}

/// Render one row as a `<record>` element with alphabetically sorted children.
pub fn build_xml_chunk(row: &ChunkRow) -> Chunk {
    let data = unflatten(&row_fields_with_identifier(row));
    let mut lines = vec![format!("<{XML_ROOT_TAG}>")];
    for key in sorted_keys(&data) {
        push_xml_element(&mut lines, key, &data[key], 1);
    }
    lines.push(format!("</{XML_ROOT_TAG}>"));
    Chunk {
        format: ChunkFormat::Xml,
        owner_id: row.owner_id.into(),
        content: lines.join("\n"),
    }
}

fn push_xml_element(lines: &mut Vec<String>, tag: &str, value: &AttributeValue, depth: usize) {
    let prefix = XML_INDENT.repeat(depth);
    match value {
        AttributeValue::Leaf(text) => {
            lines.push(format!("{prefix}<{tag}>{}</{tag}>", escape_xml(text)));
        }
        AttributeValue::Node(children) => {
            lines.push(format!("{prefix}<{tag}>"));
            for key in sorted_keys(children) {
                push_xml_element(lines, key, &children[key], depth + 1);
            }
            lines.push(format!("{prefix}</{tag}>"));
        }
    }
}

fn sorted_keys(tree: &AttributeTree) -> Vec<&str> {
    let mut keys: Vec<&str> = tree.keys().map(String::as_str).collect();
    keys.sort_unstable();
    keys
}

/// Escape the five XML special characters.
pub fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render several rows as one pipe-delimited table.
///
/// The identifier column comes first; the remaining columns are the sorted
/// union of every row's keys, with missing cells left empty.
pub fn build_markdown_chunk(rows: &[ChunkRow], identifier_type: IdentifierType) -> Chunk {
    let identifier_column = identifier_type.as_str();
    let row_fields: Vec<FlatRecord> = rows.iter().map(row_fields_with_identifier).collect();

    let other_columns: BTreeSet<&str> = row_fields
        .iter()
        .flat_map(|fields| fields.keys().map(String::as_str))
        .filter(|column| *column != identifier_column)
        .collect();
    let columns: Vec<&str> = std::iter::once(identifier_column)
        .chain(other_columns)
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(table_line(columns.iter().copied()));
    lines.push(table_line(columns.iter().map(|_| MARKDOWN_SEPARATOR_CELL)));
    for fields in &row_fields {
        lines.push(table_line(columns.iter().map(|column| {
            fields.get(*column).map(String::as_str).unwrap_or("")
        })));
    }

    Chunk {
        format: ChunkFormat::Markdown,
        owner_id: markdown_owner(rows),
        content: lines.join("\n"),
    }
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

fn markdown_owner(rows: &[ChunkRow]) -> ChunkOwner {
    let has_target = rows.iter().any(|row| row.owner_id == RowOwner::Target);
    let has_distractor = rows.iter().any(|row| row.owner_id == RowOwner::Distractor);
    match (has_target, has_distractor) {
        (true, false) => ChunkOwner::Target,
        (false, true) => ChunkOwner::Distractor,
        _ => ChunkOwner::Mixed,
    }
}
