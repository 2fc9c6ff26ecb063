//! Validated document payload type.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, InvalidInputError};

/// Field value that the store replaces with its own timestamp at write time.
pub const SERVER_TIMESTAMP: &str = "$serverTimestamp";

/// A validated document payload.
///
/// This type guarantees the payload is a JSON object, which is the only
/// shape the record store accepts. The record id is carried outside the
/// payload (see [`RawRecord`](crate::documents::RawRecord)).
///
/// # Example
///
/// ```
/// use salon_core::Fields;
/// use serde_json::json;
///
/// let fields = Fields::new(json!({
///     "name": "Cut & blow-dry",
///     "price": 32.0,
/// })).unwrap();
/// assert_eq!(fields.get("price"), Some(&json!(32.0)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fields(Map<String, Value>);

impl Fields {
    /// Create a payload from a JSON value, validating it is an object.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a JSON object.
    pub fn new(value: Value) -> Result<Self, Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(InvalidInputError::Fields {
                message: format!("expected a JSON object, got {}", type_name(&other)),
            }
            .into()),
        }
    }

    /// Create a payload directly from a JSON object map.
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns the underlying object map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Consumes the payload, returning the underlying map.
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Returns the payload as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Returns a field value, if present.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// True when the payload carries no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sentinel value resolved to the store's clock at write time.
    pub fn server_timestamp() -> Value {
        Value::String(SERVER_TIMESTAMP.to_string())
    }

    /// Shallow-merge `other` into this payload.
    ///
    /// Supplied fields overwrite existing ones; fields absent from `other`
    /// are retained. This is the merge the partial-update path uses.
    pub fn merge_from(&mut self, other: &Fields) {
        for (key, value) in other.as_map() {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Replace every `$serverTimestamp` sentinel with `now` in RFC 3339.
    pub fn resolve_server_timestamps(&mut self, now: DateTime<Utc>) {
        let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        for value in self.0.values_mut() {
            if value.as_str() == Some(SERVER_TIMESTAMP) {
                *value = Value::String(stamp.clone());
            }
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Fields {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map = Map::deserialize(deserializer)?;
        Ok(Self(map))
    }
}
