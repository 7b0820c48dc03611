// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Property record types
//!
//! A [`PropertyRecord`] is one element of the JSON array stored in the property blob.
//! The blob's schema is owned by whoever publishes it, so the record keeps every field
//! it was given, in source order, and resolves field names case-insensitively.

use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{MapAccess, Visitor},
};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Errors raised when building a record from an arbitrary JSON value
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertyRecordError {
    /// The value was not a JSON object
    #[error("expected a JSON object for a property record, found {found}")]
    NotAnObject {
        /// JSON type that was found instead
        found: &'static str,
    },
}

/// A single property entry from the blob document
///
/// Serializes back to exactly the fields it was deserialized from, in the same order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct PropertyRecord(Map<String, Value>);

impl PropertyRecord {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing field whose name matches case-insensitively
    ///
    /// When a field is replaced the original spelling of its name is kept. Each call scans
    /// the existing fields; deserialization goes through an indexed builder instead.
    pub fn insert_field(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some((_, slot)) = self
            .0
            .iter_mut()
            .find(|(existing, _)| field_names_match(existing, &name))
        {
            *slot = value;
            return;
        }
        self.0.insert(name, value);
    }

    /// Look up a field by name, ignoring case
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field).or_else(|| {
            self.0
                .iter()
                .find(|(name, _)| field_names_match(name, field))
                .map(|(_, value)| value)
        })
    }

    /// Look up a string field by name, ignoring case
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    /// Look up a numeric field by name, ignoring case
    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_f64)
    }

    /// Whether a field with this name exists, ignoring case
    pub fn contains_field(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in source order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Consume the record, returning the underlying JSON object
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

fn field_names_match(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

impl TryFrom<Value> for PropertyRecord {
    type Error = PropertyRecordError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let found = match value {
            Value::Object(map) => {
                let mut builder = RecordBuilder::with_capacity(map.len());
                for (name, value) in map {
                    builder.push(name, value);
                }
                return Ok(builder.finish());
            }
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        };
        Err(PropertyRecordError::NotAnObject { found })
    }
}

impl<'de> Deserialize<'de> for PropertyRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(PropertyRecordVisitor)
    }
}

struct PropertyRecordVisitor;

impl<'de> Visitor<'de> for PropertyRecordVisitor {
    type Value = PropertyRecord;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON object describing a property")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut builder = RecordBuilder::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            builder.push(name, value);
        }
        Ok(builder.finish())
    }
}

/// Builds a record in one pass, merging case-variant names through a lowercase index
struct RecordBuilder {
    fields: Map<String, Value>,
    spellings: HashMap<String, String>,
}

impl RecordBuilder {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Map::with_capacity(capacity),
            spellings: HashMap::with_capacity(capacity),
        }
    }

    fn push(&mut self, name: String, value: Value) {
        match self.spellings.entry(name.to_lowercase()) {
            Entry::Occupied(kept) => {
                if let Some(slot) = self.fields.get_mut(kept.get()) {
                    *slot = value;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(name.clone());
                self.fields.insert(name, value);
            }
        }
    }

    fn finish(self) -> PropertyRecord {
        PropertyRecord(self.fields)
    }
}
