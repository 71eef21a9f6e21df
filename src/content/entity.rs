//! Typed content entities
//!
//! Every object in the bucket shares a common envelope (id, slug, title,
//! timestamps) plus a metadata block whose shape depends on the object
//! type. The type discriminator is resolved once, at decode time, into the
//! [`Entity`] union; everything past the client works with concrete types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::helpers::date;

/// An image reference carried by posts and authors.
///
/// `imgix_url` accepts on-the-fly transformation query parameters; see
/// [`crate::helpers::img`]. No image processing happens locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub imgix_url: String,
}

/// Common envelope shared by every content object.
///
/// The bucket owns these records; this application only reads snapshots
/// and never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object<M> {
    /// Opaque unique identifier
    pub id: String,
    /// URL-safe identifier, unique per object type
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    /// Type-specific fields
    pub metadata: M,
}

/// A blog post.
pub type Post = Object<PostMetadata>;

/// A post author.
pub type Author = Object<AuthorMetadata>;

/// A post category.
pub type Category = Object<CategoryMetadata>;

/// Post-specific fields.
///
/// `author` and `categories` arrive embedded one reference level deep
/// (`depth=1` queries); renderers never resolve references themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostMetadata {
    /// Markdown body
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub featured_image: Image,
    pub author: Author,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Kept as the raw string the bucket returned so an unparseable value
    /// is still visible at sort time (it sorts as the epoch, like a
    /// missing one).
    #[serde(default)]
    pub published_date: Option<String>,
    /// Estimated reading time in minutes
    #[serde(default)]
    pub reading_time: Option<u32>,
}

/// Author-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorMetadata {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar: Option<Image>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Category-specific fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMetadata {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Display color as a hex string
    #[serde(default)]
    pub color: Option<String>,
}

/// The three object types this site reads from the bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Posts,
    Authors,
    Categories,
}

impl EntityKind {
    /// The discriminator string the bucket uses for this type.
    pub fn type_name(self) -> &'static str {
        match self {
            EntityKind::Posts => "posts",
            EntityKind::Authors => "authors",
            EntityKind::Categories => "categories",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A decoded content object, narrowed by its type discriminator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entity {
    #[serde(rename = "posts")]
    Post(Post),
    #[serde(rename = "authors")]
    Author(Author),
    #[serde(rename = "categories")]
    Category(Category),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Post(_) => EntityKind::Posts,
            Entity::Author(_) => EntityKind::Authors,
            Entity::Category(_) => EntityKind::Categories,
        }
    }

    pub fn into_post(self) -> Option<Post> {
        match self {
            Entity::Post(post) => Some(post),
            _ => None,
        }
    }

    pub fn into_author(self) -> Option<Author> {
        match self {
            Entity::Author(author) => Some(author),
            _ => None,
        }
    }

    pub fn into_category(self) -> Option<Category> {
        match self {
            Entity::Category(category) => Some(category),
            _ => None,
        }
    }
}

impl Post {
    /// Publish instant as a Unix timestamp, for sorting.
    ///
    /// A missing or unparseable `published_date` counts as the epoch, so
    /// undated posts sort behind every dated one in a newest-first list.
    pub fn published_timestamp(&self) -> i64 {
        date::published_timestamp(self.metadata.published_date.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_json() -> serde_json::Value {
        serde_json::json!({
            "type": "posts",
            "id": "p1",
            "slug": "hello-world",
            "title": "Hello World",
            "metadata": {
                "content": "# Hi",
                "excerpt": "A greeting",
                "featured_image": {
                    "url": "https://cdn.example.com/a.jpg",
                    "imgix_url": "https://imgix.example.com/a.jpg"
                },
                "author": {
                    "id": "a1",
                    "slug": "jane",
                    "title": "Jane",
                    "metadata": { "name": "Jane Doe" }
                },
                "categories": [],
                "published_date": "2024-03-01"
            }
        })
    }

    #[test]
    fn test_decode_post_entity() {
        let entity: Entity = serde_json::from_value(post_json()).unwrap();
        assert_eq!(entity.kind(), EntityKind::Posts);

        let post = entity.into_post().unwrap();
        assert_eq!(post.slug, "hello-world");
        assert_eq!(post.metadata.author.metadata.name, "Jane Doe");
        assert_eq!(post.metadata.reading_time, None);
    }

    #[test]
    fn test_narrowing_rejects_wrong_kind() {
        let entity: Entity = serde_json::from_value(post_json()).unwrap();
        assert!(entity.into_author().is_none());
    }

    #[test]
    fn test_published_timestamp_fallback() {
        let entity: Entity = serde_json::from_value(post_json()).unwrap();
        let mut post = entity.into_post().unwrap();
        assert!(post.published_timestamp() > 0);

        post.metadata.published_date = Some("soonish".to_string());
        assert_eq!(post.published_timestamp(), 0);

        post.metadata.published_date = None;
        assert_eq!(post.published_timestamp(), 0);
    }

    #[test]
    fn test_decode_category_entity() {
        let json = serde_json::json!({
            "type": "categories",
            "id": "c1",
            "slug": "ai",
            "title": "AI",
            "metadata": { "name": "AI", "color": "#3b82f6" }
        });
        let entity: Entity = serde_json::from_value(json).unwrap();
        let category = entity.into_category().unwrap();
        assert_eq!(category.metadata.color.as_deref(), Some("#3b82f6"));
    }
}
