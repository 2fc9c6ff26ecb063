//! Blog post records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, json};

use crate::documents::{Resource, SortSpec};
use crate::form::{FieldRule, Rule, Schema};
use crate::types::{Collection, Fields, RecordId, Slug};

/// A blog post.
///
/// The slug is derived deterministically from the title at write time;
/// the author fields are denormalized at create time so the public blog
/// page renders without a second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Store-assigned id.
    pub id: RecordId,
    /// Post title.
    pub title: String,
    /// URL slug, derived from the title.
    pub slug: Slug,
    /// Post body (markdown).
    pub content: String,
    /// Cover image, uploaded through the object store.
    #[serde(
        default,
        rename = "imageURL",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    /// Uid of the author account.
    #[serde(rename = "authorId")]
    pub author_id: RecordId,
    /// Author display name, denormalized for display.
    #[serde(
        default,
        rename = "authorName",
        skip_serializing_if = "Option::is_none"
    )]
    pub author_name: Option<String>,
    /// Publication timestamp, assigned by the store at create time.
    #[serde(rename = "publishDate")]
    pub publish_date: DateTime<Utc>,
}

impl BlogPost {
    const RULES: &'static [FieldRule] = &[
        FieldRule::new(
            "title",
            Rule::MinLen(5),
            "title must be at least 5 characters",
        ),
        FieldRule::new(
            "content",
            Rule::MinLen(50),
            "content must be at least 50 characters",
        ),
        FieldRule::new("authorId", Rule::Required, "an author is required"),
    ];

    /// Validation schema for post drafts.
    pub fn schema() -> Schema {
        Schema::new(Self::RULES)
    }

    /// Build a create draft.
    ///
    /// Derives the slug from the title and stamps the publish date with
    /// the server-timestamp sentinel, resolved by the store at write time.
    pub fn create_draft(
        title: &str,
        content: &str,
        author_id: &RecordId,
        author_name: Option<&str>,
    ) -> Fields {
        let mut map = Map::new();
        map.insert("title".to_string(), json!(title));
        map.insert(
            "slug".to_string(),
            json!(Slug::from_title(title).as_str()),
        );
        map.insert("content".to_string(), json!(content));
        map.insert("authorId".to_string(), json!(author_id.as_str()));
        if let Some(name) = author_name {
            map.insert("authorName".to_string(), json!(name));
        }
        map.insert("publishDate".to_string(), Fields::server_timestamp());
        Fields::from_map(map)
    }

    /// Build a partial update draft.
    ///
    /// A changed title re-derives the slug; untouched fields stay absent
    /// so the merge update retains them.
    pub fn update_draft(title: Option<&str>, content: Option<&str>) -> Fields {
        let mut map = Map::new();
        if let Some(title) = title {
            map.insert("title".to_string(), json!(title));
            map.insert(
                "slug".to_string(),
                json!(Slug::from_title(title).as_str()),
            );
        }
        if let Some(content) = content {
            map.insert("content".to_string(), json!(content));
        }
        Fields::from_map(map)
    }
}

impl Resource for BlogPost {
    fn collection() -> Collection {
        Collection::new("blogPosts").expect("static collection name")
    }

    fn default_order() -> SortSpec {
        SortSpec::desc("publishDate")
    }

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn filter_haystack(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RawRecord;
    use serde_json::Value;

    #[test]
    fn create_draft_derives_slug_and_timestamp_sentinel() {
        let author = RecordId::new("u1").unwrap();
        let draft = BlogPost::create_draft(
            "Summer Hair Trends 2025!",
            &"Long enough content. ".repeat(5),
            &author,
            Some("Mia"),
        );

        assert_eq!(
            draft.get("slug").and_then(Value::as_str),
            Some("summer-hair-trends-2025")
        );
        assert_eq!(
            draft.get("publishDate").and_then(Value::as_str),
            Some(crate::types::SERVER_TIMESTAMP)
        );
    }

    #[test]
    fn update_draft_rederives_slug_only_when_title_changes() {
        let draft = BlogPost::update_draft(None, Some("New body text"));
        assert!(draft.get("slug").is_none());

        let draft = BlogPost::update_draft(Some("Renamed Post"), None);
        assert_eq!(
            draft.get("slug").and_then(Value::as_str),
            Some("renamed-post")
        );
    }

    #[test]
    fn decodes_with_rfc3339_publish_date() {
        let raw = RawRecord {
            id: RecordId::new("post1").unwrap(),
            fields: Fields::new(serde_json::json!({
                "title": "Caring for bleached hair",
                "slug": "caring-for-bleached-hair",
                "content": "Bleached hair needs moisture more than anything else.",
                "authorId": "u1",
                "authorName": "Mia",
                "publishDate": "2025-06-01T12:00:00.000Z",
            }))
            .unwrap(),
        };

        let post: BlogPost = raw.decode().unwrap();
        assert_eq!(post.slug.as_str(), "caring-for-bleached-hair");
        assert_eq!(post.publish_date.to_rfc3339(), "2025-06-01T12:00:00+00:00");
    }
}
