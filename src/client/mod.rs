//! Read-only client for the remote content bucket
//!
//! Speaks the bucket's object API: every call is a GET against
//! `{api_url}/buckets/{bucket}/objects` with a JSON query, a field
//! projection and a reference-embedding depth. The read key travels as a
//! query parameter.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::config::CmsConfig;
use crate::content::{Entity, EntityKind};

/// Fields requested for every object. `type` is required: it is the
/// discriminator [`Entity`] narrows on.
const PROPS: &str = "id,slug,title,type,metadata,created_at,modified_at";

/// Errors from the bucket API.
#[derive(Debug, Error)]
pub enum CmsError {
    /// The bucket has no object matching the query. Expected during normal
    /// operation; the data-access layer maps it to empty/absent results.
    #[error("object not found")]
    NotFound,

    /// The bucket answered with a non-404 error status.
    #[error("bucket returned HTTP {0}")]
    Http(StatusCode),

    /// The request never produced a usable response.
    #[error("request to bucket failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the shape this client expects.
    #[error("could not decode bucket response: {0}")]
    Decode(String),
}

/// A narrow object query: type, optional slug, optional relation filter.
#[derive(Debug, Clone)]
pub struct Query {
    kind: EntityKind,
    slug: Option<String>,
    relation: Option<(&'static str, String)>,
}

impl Query {
    pub fn kind(kind: EntityKind) -> Self {
        Self {
            kind,
            slug: None,
            relation: None,
        }
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    /// Filter on a metadata reference field, e.g. `metadata.author`.
    pub fn with_relation(mut self, field: &'static str, id: &str) -> Self {
        self.relation = Some((field, id.to_string()));
        self
    }

    fn to_json(&self) -> serde_json::Value {
        let mut query = serde_json::json!({ "type": self.kind.type_name() });
        let map = query.as_object_mut().expect("query is an object");
        if let Some(slug) = &self.slug {
            map.insert("slug".to_string(), slug.clone().into());
        }
        if let Some((field, id)) = &self.relation {
            map.insert(field.to_string(), id.clone().into());
        }
        query
    }
}

#[derive(Deserialize)]
struct ObjectsResponse {
    objects: Vec<Entity>,
}

/// Configured handle to the remote bucket. Cheap to share; issues
/// read-only queries only.
pub struct CmsClient {
    http: reqwest::Client,
    config: CmsConfig,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cosmic-blog/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// Fetch all objects matching the query, embedded `depth` levels.
    pub async fn find(&self, query: &Query, depth: u8) -> Result<Vec<Entity>, CmsError> {
        self.fetch(query, depth, None).await
    }

    /// Fetch the single object matching the query.
    ///
    /// An empty result set counts as [`CmsError::NotFound`], same as a 404.
    pub async fn find_one(&self, query: &Query, depth: u8) -> Result<Entity, CmsError> {
        let objects = self.fetch(query, depth, Some(1)).await?;
        objects.into_iter().next().ok_or(CmsError::NotFound)
    }

    async fn fetch(
        &self,
        query: &Query,
        depth: u8,
        limit: Option<u32>,
    ) -> Result<Vec<Entity>, CmsError> {
        let url = format!(
            "{}/buckets/{}/objects",
            self.config.api_url.trim_end_matches('/'),
            self.config.bucket_slug
        );

        let mut params = vec![
            ("query".to_string(), query.to_json().to_string()),
            ("read_key".to_string(), self.config.read_key.clone()),
            ("props".to_string(), PROPS.to_string()),
            ("depth".to_string(), depth.to_string()),
        ];
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        tracing::debug!(%url, query = %query.to_json(), depth, "querying bucket");

        let response = self.http.get(&url).query(&params).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(CmsError::NotFound);
        }
        if !status.is_success() {
            return Err(CmsError::Http(status));
        }

        let body = response.bytes().await?;
        let decoded: ObjectsResponse =
            serde_json::from_slice(&body).map_err(|e| CmsError::Decode(e.to_string()))?;
        Ok(decoded.objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_json_shape() {
        let query = Query::kind(EntityKind::Posts)
            .with_relation("metadata.categories", "cat-1")
            .to_json();
        assert_eq!(query["type"], "posts");
        assert_eq!(query["metadata.categories"], "cat-1");
    }

    #[test]
    fn test_slug_query() {
        let query = Query::kind(EntityKind::Authors).with_slug("jane").to_json();
        assert_eq!(query["type"], "authors");
        assert_eq!(query["slug"], "jane");
    }
}
