//! Attribute trees and their reversible flat-path encoding.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::attributes::FIELD_PATH_DELIMITER;
use crate::types::{AttributeTree, FlatRecord};

/// One node of a personal-record attribute tree.
///
/// Leaves are always strings; there is no list variant, so every renderer
/// can assume a tree of strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Terminal string value.
    Leaf(String),
    /// Nested mapping in insertion order.
    Node(IndexMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Borrow the leaf text, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            AttributeValue::Leaf(value) => Some(value),
            AttributeValue::Node(_) => None,
        }
    }

    /// Borrow the child mapping, if this is a node.
    pub fn as_node(&self) -> Option<&AttributeTree> {
        match self {
            AttributeValue::Leaf(_) => None,
            AttributeValue::Node(children) => Some(children),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Leaf(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Leaf(value)
    }
}

impl From<AttributeTree> for AttributeValue {
    fn from(children: AttributeTree) -> Self {
        AttributeValue::Node(children)
    }
}

/// Flatten a tree into `path -> value` entries, depth-first in insertion order.
pub fn flatten(tree: &AttributeTree) -> FlatRecord {
    let mut flat = FlatRecord::new();
    flatten_into(tree, "", &mut flat);
    flat
}

fn flatten_into(tree: &AttributeTree, prefix: &str, flat: &mut FlatRecord) {
    for (key, value) in tree {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}{FIELD_PATH_DELIMITER}{key}")
        };
        match value {
            AttributeValue::Leaf(text) => {
                flat.insert(path, text.clone());
            }
            AttributeValue::Node(children) => flatten_into(children, &path, flat),
        }
    }
}

/// Rebuild a tree from flat entries.
///
/// Intermediate nodes are created in first-seen order. A leaf standing where
/// a later path needs a node is replaced by that node.
pub fn unflatten(flat: &FlatRecord) -> AttributeTree {
    let mut root = AttributeTree::new();
    for (path, value) in flat {
        let segments: Vec<&str> = path.split(FIELD_PATH_DELIMITER).collect();
        let Some((leaf_key, parents)) = segments.split_last() else {
            continue;
        };
        let mut cursor = &mut root;
        for segment in parents {
            cursor = descend(cursor, segment);
        }
        cursor.insert((*leaf_key).to_string(), AttributeValue::Leaf(value.clone()));
    }
    root
}

fn descend<'a>(tree: &'a mut AttributeTree, segment: &str) -> &'a mut AttributeTree {
    let slot = tree
        .entry(segment.to_string())
        .or_insert_with(|| AttributeValue::Node(AttributeTree::new()));
    if matches!(*slot, AttributeValue::Leaf(_)) {
        *slot = AttributeValue::Node(AttributeTree::new());
    }
    match slot {
        AttributeValue::Node(children) => children,
        AttributeValue::Leaf(_) => unreachable!("leaf replaced by node above"),
    }
}
