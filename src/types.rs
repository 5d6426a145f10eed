use indexmap::IndexMap;

use crate::attributes::AttributeValue;

/// Delimited path of a flattened attribute.
/// Examples: `work__company`, `bank_account__credit_card__number`
pub type FieldPath = String;
/// Leaf value of an attribute tree (dates and coordinates are pre-stringified).
/// Examples: `1987-03-14`, `(40.712800, -74.006000)`
pub type FieldValue = String;
/// Flattened attribute mapping in insertion order.
/// Example: `{"profile__sex": "F", "car__vin": "1HGCM82633A004352"}`
pub type FlatRecord = IndexMap<FieldPath, FieldValue>;
/// Nested attribute mapping keyed by segment name.
pub type AttributeTree = IndexMap<String, AttributeValue>;
/// Globally unique identifiers of one identity.
/// Example: `{"name": "Ada Moreno", "ssn": "512-44-9031"}`
pub type IdentifierMap = IndexMap<String, String>;
/// Prompt text handed to a message generator.
/// Example: `Write a casual WhatsApp style check-in.`
pub type Prompt = String;
