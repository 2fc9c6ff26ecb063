//! Salon service records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, json};
use std::fmt;
use std::str::FromStr;

use crate::catalog::CatalogItem;
use crate::documents::{Resource, SortSpec};
use crate::error::{Error, InvalidInputError};
use crate::form::{FieldRule, Rule, Schema};
use crate::types::{Collection, Fields, RecordId};

/// Closed category set for services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    /// Haircuts.
    Cut,
    /// Coloring, balayage, highlights.
    Coloring,
    /// Blow-dry and styling.
    Styling,
    /// Event and occasion updos.
    Updo,
}

impl ServiceCategory {
    /// Every category, in menu order.
    pub const ALL: &'static [&'static str] = &["cut", "coloring", "styling", "updo"];

    /// Returns the wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Cut => "cut",
            ServiceCategory::Coloring => "coloring",
            ServiceCategory::Styling => "styling",
            ServiceCategory::Updo => "updo",
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ServiceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cut" => Ok(ServiceCategory::Cut),
            "coloring" => Ok(ServiceCategory::Coloring),
            "styling" => Ok(ServiceCategory::Styling),
            "updo" => Ok(ServiceCategory::Updo),
            other => Err(InvalidInputError::Other {
                message: format!(
                    "unknown category '{}' (cut, coloring, styling, updo)",
                    other
                ),
            }
            .into()),
        }
    }
}

/// A customer review attached to a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Reviewer display name.
    pub author: String,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Review text.
    pub text: String,
    /// Optional display date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// A bookable salon service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Store-assigned id.
    pub id: RecordId,
    /// Service name.
    pub name: String,
    /// Longer description shown in the catalog detail.
    pub description: String,
    /// Regular price in EUR.
    pub price: f64,
    /// Discounted price while a promotion runs.
    #[serde(
        default,
        rename = "salePrice",
        skip_serializing_if = "Option::is_none"
    )]
    pub sale_price: Option<f64>,
    /// Duration in minutes.
    pub duration: u32,
    /// Category.
    pub category: ServiceCategory,
    /// Optional second-level grouping within the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Customer reviews, newest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
}

impl Service {
    const RULES: &'static [FieldRule] = &[
        FieldRule::new(
            "name",
            Rule::MinLen(2),
            "service name must be at least 2 characters",
        ),
        FieldRule::new(
            "description",
            Rule::MinLen(10),
            "description must be at least 10 characters",
        ),
        FieldRule::new("price", Rule::Positive, "price must be a positive number"),
        FieldRule::new(
            "duration",
            Rule::PositiveInt,
            "duration must be a positive whole number of minutes",
        ),
        FieldRule::new(
            "category",
            Rule::OneOf(ServiceCategory::ALL),
            "please pick a category",
        ),
    ];

    /// Validation schema for service drafts.
    pub fn schema() -> Schema {
        Schema::new(Self::RULES)
    }

    /// Build a create/update draft payload.
    pub fn draft(
        name: &str,
        description: &str,
        price: f64,
        duration: u32,
        category: &str,
    ) -> Fields {
        let mut map = Map::new();
        map.insert("name".to_string(), json!(name));
        map.insert("description".to_string(), json!(description));
        map.insert("price".to_string(), json!(price));
        map.insert("duration".to_string(), json!(duration));
        map.insert("category".to_string(), json!(category));
        Fields::from_map(map)
    }

    /// The price the catalog evaluates: sale price when present.
    pub fn effective_price(&self) -> f64 {
        self.sale_price.unwrap_or(self.price)
    }
}

impl Resource for Service {
    fn collection() -> Collection {
        Collection::new("services").expect("static collection name")
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

impl CatalogItem for Service {
    fn title(&self) -> &str {
        &self.name
    }

    fn description(&self) -> Option<&str> {
        Some(&self.description)
    }

    fn category(&self) -> Option<&str> {
        Some(self.category.as_str())
    }

    fn subcategory(&self) -> Option<&str> {
        self.subcategory.as_deref()
    }

    fn base_price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn sale_price(&self) -> Option<f64> {
        self.sale_price
    }

    fn duration_minutes(&self) -> Option<f64> {
        Some(f64::from(self.duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RawRecord;
    use serde_json::json;

    #[test]
    fn decodes_from_raw_record() {
        let raw = RawRecord {
            id: RecordId::new("svc1").unwrap(),
            fields: Fields::new(json!({
                "name": "Balayage",
                "description": "Full balayage with toner and blow-dry",
                "price": 120.0,
                "salePrice": 95.0,
                "duration": 150,
                "category": "coloring",
                "subcategory": "balayage",
            }))
            .unwrap(),
        };

        let service: Service = raw.decode().unwrap();

        assert_eq!(service.id.as_str(), "svc1");
        assert_eq!(service.category, ServiceCategory::Coloring);
        assert_eq!(service.effective_price(), 95.0);
        assert!(service.reviews.is_empty());
    }

    #[test]
    fn schema_accepts_a_complete_draft() {
        let draft = Service::draft("Cut", "Classic cut with wash", 32.0, 45, "cut");
        assert!(Service::schema().validate(&draft).is_empty());
    }

    #[test]
    fn schema_rejects_unknown_category() {
        let draft = Service::draft("Cut", "Classic cut with wash", 32.0, 45, "massage");
        let violations = Service::schema().validate(&draft);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "category");
    }
}
