//! Retail product records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, json};

use crate::catalog::CatalogItem;
use crate::documents::{Resource, SortSpec};
use crate::form::{FieldRule, Rule, Schema};
use crate::types::{Collection, Fields, RecordId};

/// A retail product sold at the front desk and in the shop page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Store-assigned id.
    pub id: RecordId,
    /// Product name.
    pub name: String,
    /// Description shown on the shop page.
    pub description: String,
    /// Price in EUR.
    pub price: f64,
    /// Product photo, uploaded through the object store.
    #[serde(
        default,
        rename = "imageURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
}

impl Product {
    const RULES: &'static [FieldRule] = &[
        FieldRule::new("name", Rule::MinLen(2), "name must be at least 2 characters"),
        FieldRule::new(
            "description",
            Rule::MinLen(10),
            "description must be at least 10 characters",
        ),
        FieldRule::new("price", Rule::Positive, "price must be a positive number"),
    ];

    /// Validation schema for product drafts.
    pub fn schema() -> Schema {
        Schema::new(Self::RULES)
    }

    /// Build a create/update draft payload.
    pub fn draft(name: &str, description: &str, price: f64) -> Fields {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(name));
        map.insert("description".to_string(), json!(description));
        map.insert("price".to_string(), json!(price));
        Fields::from_map(map)
    }
}

impl Resource for Product {
    fn collection() -> Collection {
        Collection::new("products").expect("static collection name")
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
        format!("{} {}", self.name, self.description)
    }
}

impl CatalogItem for Product {
    fn title(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn base_price(&self) -> Option<f64> {
        Some(self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_positive_price() {
        let draft = Product::draft("Argan oil", "Lightweight finishing oil", 0.0);
        let violations = Product::schema().validate(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "price");
    }
}
