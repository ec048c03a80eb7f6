//! Bounded, binary-free configuration snapshots.
//!
//! A snapshot is a flat map of field name to scalar or short string. There is no
//! variant for bytes, and strings are length-checked when constructed, so media
//! payloads cannot enter a snapshot.

use reelsmith_error::{PersistenceError, PersistenceErrorKind};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// Largest string accepted into a snapshot, in bytes.
pub const MAX_SNAPSHOT_TEXT_BYTES: usize = 32 * 1024;

/// A string known to fit in a snapshot.
///
/// # Examples
///
/// ```
/// use reelsmith_core::{MAX_SNAPSHOT_TEXT_BYTES, ShortText};
///
/// assert!(ShortText::new("Cinematic & Epic").is_ok());
/// assert!(ShortText::new("A".repeat(MAX_SNAPSHOT_TEXT_BYTES + 1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct ShortText(String);

impl ShortText {
    /// Accept `text` if it is within [`MAX_SNAPSHOT_TEXT_BYTES`].
    pub fn new(text: impl Into<String>) -> Result<Self, PersistenceError> {
        let text = text.into();
        if text.len() > MAX_SNAPSHOT_TEXT_BYTES {
            return Err(PersistenceError::new(PersistenceErrorKind::TextTooLong {
                size: text.len(),
                limit: MAX_SNAPSHOT_TEXT_BYTES,
            }));
        }
        Ok(Self(text))
    }

    /// The text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single snapshot field value.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotValue {
    /// Boolean toggle
    Flag(bool),
    /// Whole number (sliders, counts)
    Integer(i64),
    /// Finite floating point number
    Number(f64),
    /// Short string (prompt text, selected option)
    Text(ShortText),
}

impl SnapshotValue {
    /// Boolean value, if this is a flag.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SnapshotValue::Flag(value) => Some(*value),
            _ => None,
        }
    }

    /// Integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SnapshotValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            SnapshotValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    fn to_json(&self) -> JsonValue {
        match self {
            SnapshotValue::Flag(value) => JsonValue::Bool(*value),
            SnapshotValue::Integer(value) => JsonValue::from(*value),
            SnapshotValue::Number(value) => JsonValue::from(*value),
            SnapshotValue::Text(text) => JsonValue::String(text.as_str().to_string()),
        }
    }

    fn from_json(value: &JsonValue) -> Option<Self> {
        match value {
            JsonValue::Bool(flag) => Some(SnapshotValue::Flag(*flag)),
            JsonValue::Number(number) => match number.as_i64() {
                Some(integer) => Some(SnapshotValue::Integer(integer)),
                None => number
                    .as_f64()
                    .filter(|float| float.is_finite())
                    .map(SnapshotValue::Number),
            },
            JsonValue::String(text) => ShortText::new(text.clone()).ok().map(SnapshotValue::Text),
            _ => None,
        }
    }
}

/// A flat, ordered mapping of field name to [`SnapshotValue`].
///
/// # Examples
///
/// ```
/// use reelsmith_core::{ConfigSnapshot, SnapshotValue};
///
/// let mut snapshot = ConfigSnapshot::new();
/// snapshot.insert_flag("include_voiceover", true);
/// snapshot.insert_integer("creativity_level", 5);
/// snapshot.insert_text("vibe", "Modern & Clean").unwrap();
///
/// let json = snapshot.to_json_string().unwrap();
/// let restored = ConfigSnapshot::from_json_str(&json).unwrap();
/// assert_eq!(restored, snapshot);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigSnapshot {
    fields: BTreeMap<String, SnapshotValue>,
}

impl ConfigSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field.
    pub fn insert(&mut self, key: impl Into<String>, value: SnapshotValue) {
        self.fields.insert(key.into(), value);
    }

    /// Set a boolean field.
    pub fn insert_flag(&mut self, key: impl Into<String>, value: bool) {
        self.insert(key, SnapshotValue::Flag(value));
    }

    /// Set an integer field.
    pub fn insert_integer(&mut self, key: impl Into<String>, value: i64) {
        self.insert(key, SnapshotValue::Integer(value));
    }

    /// Set a text field, rejecting oversized text.
    pub fn insert_text(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), PersistenceError> {
        let text = ShortText::new(value)?;
        self.insert(key, SnapshotValue::Text(text));
        Ok(())
    }

    /// Get a field.
    pub fn get(&self, key: &str) -> Option<&SnapshotValue> {
        self.fields.get(key)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SnapshotValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Serialize as a JSON object.
    pub fn to_json_string(&self) -> Result<String, PersistenceError> {
        let object: Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(key, value)| (key.clone(), value.to_json()))
            .collect();
        serde_json::to_string(&JsonValue::Object(object))
            .map_err(|e| PersistenceError::new(PersistenceErrorKind::Serialize(e.to_string())))
    }

    /// Parse a JSON object, keeping only well-formed fields.
    ///
    /// Entries that are not a flag, number or short string are dropped. Only a
    /// document that is not a JSON object at all is an error.
    pub fn from_json_str(json: &str) -> Result<Self, PersistenceError> {
        let value: JsonValue = serde_json::from_str(json)
            .map_err(|e| PersistenceError::new(PersistenceErrorKind::Read(e.to_string())))?;
        let JsonValue::Object(object) = value else {
            return Err(PersistenceError::new(PersistenceErrorKind::Read(
                "snapshot is not a JSON object".to_string(),
            )));
        };

        let mut snapshot = Self::new();
        for (key, value) in &object {
            match SnapshotValue::from_json(value) {
                Some(value) => snapshot.insert(key.clone(), value),
                None => tracing::debug!(key = %key, "Dropping malformed snapshot field"),
            }
        }
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_fields_are_dropped() {
        let json = r#"{"vibe": "Random", "storyboard": null, "nested": {"a": 1}, "level": 7}"#;
        let snapshot = ConfigSnapshot::from_json_str(json).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("vibe").and_then(|v| v.as_text()), Some("Random"));
        assert_eq!(snapshot.get("level").and_then(|v| v.as_integer()), Some(7));
    }

    #[test]
    fn non_object_document_is_an_error() {
        assert!(ConfigSnapshot::from_json_str("[1, 2, 3]").is_err());
        assert!(ConfigSnapshot::from_json_str("not json").is_err());
    }

    #[test]
    fn float_fields_survive_round_trip() {
        let mut snapshot = ConfigSnapshot::new();
        snapshot.insert("ratio", SnapshotValue::Number(0.75));
        snapshot.insert("whole", SnapshotValue::Number(2.0));

        let restored = ConfigSnapshot::from_json_str(&snapshot.to_json_string().unwrap()).unwrap();
        assert_eq!(restored, snapshot);
    }
}
