//! Document types shared by every record store adapter.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{AdapterError, Error};
use crate::types::{Collection, Fields, RecordId};

/// A raw document from the record store: id plus payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The store-assigned document id.
    pub id: RecordId,

    /// The document payload.
    ///
    /// Guaranteed to be a JSON object; interpretation is left to the typed
    /// record layer.
    pub fields: Fields,
}

impl RawRecord {
    /// Decode this document into a typed record.
    ///
    /// The id is injected into the payload before decoding, so record types
    /// declare a plain `id` field.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not match the record shape.
    pub fn decode<T: Resource>(&self) -> Result<T, Error> {
        let mut map = self.fields.as_map().clone();
        map.insert("id".to_string(), Value::String(self.id.as_str().to_string()));

        serde_json::from_value(Value::Object(map)).map_err(|e| {
            AdapterError::Document {
                message: format!(
                    "{} record '{}' failed to decode: {}",
                    T::collection(),
                    self.id,
                    e
                ),
            }
            .into()
        })
    }
}

/// One full, ordered state of a watched collection.
///
/// Subscriptions always deliver the whole list; consumers replace their
/// copy wholesale rather than patching incrementally.
pub type Snapshot = Vec<RawRecord>;

/// Decode a whole snapshot into typed records.
pub fn decode_all<T: Resource>(records: &[RawRecord]) -> Result<Vec<T>, Error> {
    records.iter().map(RawRecord::decode).collect()
}

/// Sort direction for store-side ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Returns the wire spelling ("asc"/"desc").
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Store-side ordering of a listed or watched collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field the store orders by.
    pub field: String,
    /// Order direction.
    pub direction: Direction,
}

impl SortSpec {
    /// Ascending order on the given field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending order on the given field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::asc("name")
    }
}

/// Total order over JSON field values, used for store-side sorting.
///
/// Null and missing values order last; mixed types order by type
/// (bool < number < string) so sorting stays total.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Greater,
        (Some(_), None | Some(Value::Null)) => Ordering::Less,
        (Some(a), Some(b)) => match (a, b) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Number(a), Value::Number(b)) => {
                let a = a.as_f64().unwrap_or(f64::NAN);
                let b = b.as_f64().unwrap_or(f64::NAN);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => rank(a).cmp(&rank(b)),
        },
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// A typed record manageable through the generic resource table.
///
/// Binds a record type to its collection, id, display label and the
/// haystack the table's global free-text filter searches.
pub trait Resource: Clone + Send + Sync + Serialize + DeserializeOwned {
    /// The collection this record type lives in.
    fn collection() -> Collection;

    /// The store-side ordering for listings of this type.
    fn default_order() -> SortSpec {
        SortSpec::default()
    }

    /// The document id.
    fn id(&self) -> &RecordId;

    /// Short human label for notices ("Cut & blow-dry", a post title).
    fn label(&self) -> &str;

    /// Text the table's global free-text filter matches against.
    fn filter_haystack(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn value_order_puts_missing_last() {
        let a = json!("alpha");
        assert_eq!(compare_values(Some(&a), None), Ordering::Less);
        assert_eq!(compare_values(None, Some(&a)), Ordering::Greater);
        assert_eq!(compare_values(None, None), Ordering::Equal);
    }

    #[test]
    fn numbers_compare_numerically() {
        let a = json!(9);
        let b = json!(11.5);
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Less);
    }

    #[test]
    fn strings_compare_lexically() {
        let a = json!("balayage");
        let b = json!("cut");
        assert_eq!(compare_values(Some(&a), Some(&b)), Ordering::Less);
    }
}
