//! Data-access layer
//!
//! [`ContentStore`] is the only thing the rendering layer talks to. It
//! turns narrow typed queries into bucket calls and normalizes the two
//! outcomes that matter:
//!
//! - not-found is a normal result ("no posts yet" is a valid page), so it
//!   becomes an empty list or `None`, never an error;
//! - every other failure means a misconfigured client or an outage and is
//!   escalated as a [`StoreError`] naming the attempted operation. No
//!   retries, no partial results.

use thiserror::Error;

use crate::client::{CmsClient, CmsError, Query};
use crate::content::{Author, Category, Entity, EntityKind, Post};

/// A non-not-found failure while fetching content.
///
/// The message names what was being fetched ("posts", "author: jane", ...);
/// the underlying cause is preserved as the error source.
#[derive(Debug, Error)]
#[error("failed to fetch {operation}")]
pub struct StoreError {
    operation: String,
    #[source]
    source: CmsError,
}

impl StoreError {
    fn new(operation: impl Into<String>, source: CmsError) -> Self {
        Self {
            operation: operation.into(),
            source,
        }
    }

    /// The operation description, e.g. `posts by category`.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Typed read access to the content bucket.
pub struct ContentStore {
    client: CmsClient,
}

impl ContentStore {
    pub fn new(client: CmsClient) -> Self {
        Self { client }
    }

    /// All posts, newest first. Undated posts sort last.
    pub async fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        let query = Query::kind(EntityKind::Posts);
        self.post_list(&query, "posts").await
    }

    /// Posts referencing the given author id, newest first.
    pub async fn posts_by_author(&self, author_id: &str) -> Result<Vec<Post>, StoreError> {
        let query = Query::kind(EntityKind::Posts).with_relation("metadata.author", author_id);
        self.post_list(&query, "posts by author").await
    }

    /// Posts referencing the given category id, newest first.
    pub async fn posts_by_category(&self, category_id: &str) -> Result<Vec<Post>, StoreError> {
        let query =
            Query::kind(EntityKind::Posts).with_relation("metadata.categories", category_id);
        self.post_list(&query, "posts by category").await
    }

    /// A single post with its author and categories embedded.
    pub async fn post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let query = Query::kind(EntityKind::Posts).with_slug(slug);
        let operation = format!("post: {slug}");
        let entity = self.get(&query, 1, &operation).await?;
        entity
            .map(|e| narrow(e, EntityKind::Posts, Entity::into_post))
            .transpose()
            .map_err(|err| StoreError::new(operation, err))
    }

    /// All authors, in the order the bucket returns them.
    pub async fn all_authors(&self) -> Result<Vec<Author>, StoreError> {
        let query = Query::kind(EntityKind::Authors);
        let entities = self.list(&query, 0, "authors").await?;
        narrow_all(entities, EntityKind::Authors, Entity::into_author)
            .map_err(|err| StoreError::new("authors", err))
    }

    pub async fn author_by_slug(&self, slug: &str) -> Result<Option<Author>, StoreError> {
        let query = Query::kind(EntityKind::Authors).with_slug(slug);
        let operation = format!("author: {slug}");
        let entity = self.get(&query, 0, &operation).await?;
        entity
            .map(|e| narrow(e, EntityKind::Authors, Entity::into_author))
            .transpose()
            .map_err(|err| StoreError::new(operation, err))
    }

    /// All categories, in the order the bucket returns them.
    pub async fn all_categories(&self) -> Result<Vec<Category>, StoreError> {
        let query = Query::kind(EntityKind::Categories);
        let entities = self.list(&query, 0, "categories").await?;
        narrow_all(entities, EntityKind::Categories, Entity::into_category)
            .map_err(|err| StoreError::new("categories", err))
    }

    pub async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let query = Query::kind(EntityKind::Categories).with_slug(slug);
        let operation = format!("category: {slug}");
        let entity = self.get(&query, 0, &operation).await?;
        entity
            .map(|e| narrow(e, EntityKind::Categories, Entity::into_category))
            .transpose()
            .map_err(|err| StoreError::new(operation, err))
    }

    /// Shared path for the post list queries: depth-1 fetch, narrow, sort.
    async fn post_list(&self, query: &Query, operation: &str) -> Result<Vec<Post>, StoreError> {
        let entities = self.list(query, 1, operation).await?;
        let mut posts = narrow_all(entities, EntityKind::Posts, Entity::into_post)
            .map_err(|err| StoreError::new(operation, err))?;
        sort_newest_first(&mut posts);
        Ok(posts)
    }

    async fn list(
        &self,
        query: &Query,
        depth: u8,
        operation: &str,
    ) -> Result<Vec<Entity>, StoreError> {
        match self.client.find(query, depth).await {
            Ok(entities) => Ok(entities),
            Err(CmsError::NotFound) => Ok(Vec::new()),
            Err(err) => Err(StoreError::new(operation, err)),
        }
    }

    async fn get(
        &self,
        query: &Query,
        depth: u8,
        operation: &str,
    ) -> Result<Option<Entity>, StoreError> {
        match self.client.find_one(query, depth).await {
            Ok(entity) => Ok(Some(entity)),
            Err(CmsError::NotFound) => Ok(None),
            Err(err) => Err(StoreError::new(operation, err)),
        }
    }
}

/// Sort posts descending by publish timestamp.
///
/// Stable, so posts sharing a timestamp (including every undated post,
/// which counts as the epoch) keep the bucket's order among themselves.
fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_key(|post| std::cmp::Reverse(post.published_timestamp()));
}

fn narrow<T>(
    entity: Entity,
    expected: EntityKind,
    into: impl Fn(Entity) -> Option<T>,
) -> Result<T, CmsError> {
    let found = entity.kind();
    into(entity).ok_or_else(|| {
        CmsError::Decode(format!("expected a {expected} object, got {found}"))
    })
}

fn narrow_all<T>(
    entities: Vec<Entity>,
    expected: EntityKind,
    into: impl Fn(Entity) -> Option<T>,
) -> Result<Vec<T>, CmsError> {
    entities
        .into_iter()
        .map(|entity| narrow(entity, expected, &into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{AuthorMetadata, Image, Object, PostMetadata};

    fn make_post(slug: &str, published_date: Option<&str>) -> Post {
        Object {
            id: format!("id-{slug}"),
            slug: slug.to_string(),
            title: slug.to_string(),
            created_at: None,
            modified_at: None,
            metadata: PostMetadata {
                content: String::new(),
                excerpt: None,
                featured_image: Image {
                    url: "https://cdn.example.com/a.jpg".to_string(),
                    imgix_url: "https://imgix.example.com/a.jpg".to_string(),
                },
                author: Object {
                    id: "a1".to_string(),
                    slug: "jane".to_string(),
                    title: "Jane".to_string(),
                    created_at: None,
                    modified_at: None,
                    metadata: AuthorMetadata {
                        name: "Jane Doe".to_string(),
                        bio: None,
                        avatar: None,
                        role: None,
                        twitter: None,
                        github: None,
                        website: None,
                    },
                },
                categories: Vec::new(),
                published_date: published_date.map(String::from),
                reading_time: None,
            },
        }
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            make_post("old", Some("2024-01-10")),
            make_post("new", Some("2024-03-01")),
            make_post("undated", None),
        ];
        sort_newest_first(&mut posts);

        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "undated"]);
    }

    #[test]
    fn test_unparseable_date_sorts_like_missing() {
        let mut posts = vec![
            make_post("garbled", Some("soonish")),
            make_post("dated", Some("2024-01-10")),
            make_post("undated", None),
        ];
        sort_newest_first(&mut posts);

        assert_eq!(posts[0].slug, "dated");
        // Stable sort keeps the remote order among epoch-dated posts
        assert_eq!(posts[1].slug, "garbled");
        assert_eq!(posts[2].slug, "undated");
    }

    #[test]
    fn test_narrow_rejects_mismatched_kind() {
        let entity = Entity::Post(make_post("p", None));
        let result = narrow(entity, EntityKind::Authors, Entity::into_author);
        assert!(matches!(result, Err(CmsError::Decode(_))));
    }

    #[test]
    fn test_store_error_names_operation() {
        let err = StoreError::new("posts by category", CmsError::NotFound);
        assert_eq!(err.to_string(), "failed to fetch posts by category");
        assert_eq!(err.operation(), "posts by category");
    }
}
