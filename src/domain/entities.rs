//! Records mirrored from the managed backend's `posts` table.

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// A single row of the `posts` table.
///
/// Columns the backend may hand back as `null` decode to their empty/zero
/// default so ordering and search never have to special-case them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub published: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "type", default)]
    pub post_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub order_index: i64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub project_link: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
}

impl PostRecord {
    pub fn excerpt_or_empty(&self) -> &str {
        self.excerpt.as_deref().unwrap_or("")
    }

    pub fn category_str(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn type_str(&self) -> Option<&str> {
        self.post_type.as_deref()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row_with_nulls() {
        let row = serde_json::json!({
            "id": "a1",
            "title": "Hello",
            "excerpt": null,
            "cover_image": null,
            "created_at": "2024-05-01T12:34:56.123456+00:00",
            "slug": "hello",
            "published": true,
            "category": null,
            "type": "post",
            "order_index": null,
            "content": "<p>hi</p>"
        });

        let post: PostRecord = serde_json::from_value(row).expect("row decodes");
        assert_eq!(post.order_index, 0);
        assert_eq!(post.excerpt_or_empty(), "");
        assert_eq!(post.type_str(), Some("post"));
        assert_eq!(post.project_link, None);
    }

    #[test]
    fn serializes_type_under_wire_name() {
        let row = serde_json::json!({
            "id": "p1",
            "title": "Tool",
            "created_at": "2024-01-01T00:00:00Z",
            "slug": "tool",
            "published": false,
            "type": "project",
            "order_index": 3
        });
        let post: PostRecord = serde_json::from_value(row).expect("row decodes");
        let value = serde_json::to_value(&post).expect("serializes");
        assert_eq!(value["type"], "project");
        assert_eq!(value["order_index"], 3);
    }
}
