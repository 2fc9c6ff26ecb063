//! Stylist profile records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, json};

use crate::documents::{Resource, SortSpec};
use crate::form::{FieldRule, Rule, Schema};
use crate::types::{Collection, Fields, RecordId};

/// A stylist profile shown on the team page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stylist {
    /// Store-assigned id.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Short biography.
    pub bio: String,
    /// What they are best at ("balayage", "barbering").
    pub specialty: String,
    /// Profile photo, uploaded through the object store.
    #[serde(
        default,
        rename = "photoURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo_url: Option<String>,
}

impl Stylist {
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("name", Rule::MinLen(2), "name must be at least 2 characters"),
        FieldRule::new("bio", Rule::MinLen(10), "bio must be at least 10 characters"),
        FieldRule::new(
            "specialty",
            Rule::MinLen(2),
            "specialty must be at least 2 characters",
        ),
    ];

    /// Validation schema for stylist drafts.
    pub fn schema() -> Schema {
        Schema::new(Self::RULES)
    }

    /// Build a create/update draft payload.
    pub fn draft(name: &str, bio: &str, specialty: &str) -> Fields {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(name));
        map.insert("bio".to_string(), json!(bio));
        map.insert("specialty".to_string(), json!(specialty));
        Fields::from_map(map)
    }
}

impl Resource for Stylist {
    fn collection() -> Collection {
        Collection::new("stylists").expect("static collection name")
    }

    fn default_order() -> SortSpec {
        SortSpec::asc("name")
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn filter_haystack(&self) -> String {
        format!("{} {}", self.name, self.specialty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RawRecord;
    use serde_json::json;

    #[test]
    fn photo_url_is_optional() {
        let raw = RawRecord {
            id: RecordId::new("sty1").unwrap(),
            fields: Fields::new(json!({
                "name": "Mia",
                "bio": "Ten years of color work",
                "specialty": "balayage",
            }))
            .unwrap(),
        };

        let stylist: Stylist = raw.decode().unwrap();
        assert!(stylist.photo_url.is_none());
    }

    #[test]
    fn schema_collects_short_fields() {
        let draft = Stylist::draft("M", "short", "x");
        let violations = Stylist::schema().validate(&draft);
        assert_eq!(violations.len(), 3);
    }
}
