//! HTTP server and page handlers
//!
//! One handler per page. Each handler fetches what it needs from the
//! content store (independent lists concurrently), builds a template
//! context and renders. An absent primary entity becomes a 404 page; a
//! [`StoreError`] becomes a 500 with no recovery attempt.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tera::Context;
use tower_http::trace::TraceLayer;

use crate::content::Category;
use crate::store::StoreError;
use crate::Blog;

const SITE_CSS: &str = include_str!("assets/site.css");
const NAV_JS: &str = include_str!("assets/nav.js");

/// Bare-bones 500 page. Rendered without the template set so a broken
/// renderer cannot take the error page down with it.
const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en"><head><meta charset="utf-8"><title>Something went wrong</title></head>
<body><h1>Something went wrong</h1><p>Please try again later.</p></body></html>
"#;

/// A failed page render.
#[derive(Debug)]
enum PageError {
    /// The content bucket could not be reached or answered badly
    Store(StoreError),
    /// Template or markdown rendering failed
    Render(anyhow::Error),
}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError::Store(err)
    }
}

impl From<anyhow::Error> for PageError {
    fn from(err: anyhow::Error) -> Self {
        PageError::Render(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match &self {
            PageError::Store(err) => tracing::error!("content fetch failed: {}", err),
            PageError::Render(err) => tracing::error!("page render failed: {:#}", err),
        }
        (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
    }
}

/// Start the blog server.
pub async fn start(blog: Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(blog);

    let app = Router::new()
        .route("/", get(home_page))
        .route("/posts/:slug", get(post_page))
        .route("/authors/:slug", get(author_page))
        .route("/categories/:slug", get(category_page))
        .route("/assets/site.css", get(site_css))
        .route("/assets/nav.js", get(nav_js))
        .fallback(fallback_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Handle "localhost" specially, like a browser would
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("listening on http://{}:{}", ip, port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Base context every page shares: site settings and the nav categories.
fn page_context(blog: &Blog, categories: &[Category]) -> Context {
    let mut ctx = Context::new();
    ctx.insert("site", &blog.site);
    ctx.insert(
        "nav_categories",
        &categories
            .iter()
            .take(blog.site.nav_category_limit)
            .collect::<Vec<_>>(),
    );
    ctx
}

/// Render the 404 page. Uses an empty nav so a missing page never depends
/// on another bucket fetch.
fn not_found_page(blog: &Blog) -> Result<Response, PageError> {
    let ctx = page_context(blog, &[]);
    let body = blog.templates.render("not_found.html", &ctx)?;
    Ok((StatusCode::NOT_FOUND, Html(body)).into_response())
}

async fn home_page(State(blog): State<Arc<Blog>>) -> Result<Response, PageError> {
    // Independent lists, fetched concurrently
    let (posts, categories) =
        tokio::try_join!(blog.store.all_posts(), blog.store.all_categories())?;

    let mut ctx = page_context(&blog, &categories);
    ctx.insert("featured", &posts.first());
    ctx.insert(
        "recent_posts",
        &posts
            .iter()
            .skip(1)
            .take(blog.site.recent_post_limit)
            .collect::<Vec<_>>(),
    );
    ctx.insert("categories", &categories);

    let body = blog.templates.render("home.html", &ctx)?;
    Ok(Html(body).into_response())
}

async fn post_page(
    State(blog): State<Arc<Blog>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let (post, categories) = tokio::try_join!(
        blog.store.post_by_slug(&slug),
        blog.store.all_categories()
    )?;

    let Some(post) = post else {
        return not_found_page(&blog);
    };

    let content_html = blog.markdown.render(&post.metadata.content)?;

    let mut ctx = page_context(&blog, &categories);
    ctx.insert("post", &post);
    ctx.insert("content_html", &content_html);

    let body = blog.templates.render("post.html", &ctx)?;
    Ok(Html(body).into_response())
}

async fn author_page(
    State(blog): State<Arc<Blog>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let (author, categories) = tokio::try_join!(
        blog.store.author_by_slug(&slug),
        blog.store.all_categories()
    )?;

    let Some(author) = author else {
        return not_found_page(&blog);
    };

    let posts = blog.store.posts_by_author(&author.id).await?;

    let mut ctx = page_context(&blog, &categories);
    ctx.insert("author", &author);
    ctx.insert("posts", &posts);

    let body = blog.templates.render("author.html", &ctx)?;
    Ok(Html(body).into_response())
}

async fn category_page(
    State(blog): State<Arc<Blog>>,
    Path(slug): Path<String>,
) -> Result<Response, PageError> {
    let (category, categories) = tokio::try_join!(
        blog.store.category_by_slug(&slug),
        blog.store.all_categories()
    )?;

    let Some(category) = category else {
        return not_found_page(&blog);
    };

    let posts = blog.store.posts_by_category(&category.id).await?;

    let mut ctx = page_context(&blog, &categories);
    ctx.insert("category", &category);
    ctx.insert("posts", &posts);

    let body = blog.templates.render("category.html", &ctx)?;
    Ok(Html(body).into_response())
}

async fn fallback_page(State(blog): State<Arc<Blog>>) -> Result<Response, PageError> {
    not_found_page(&blog)
}

async fn site_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], SITE_CSS)
}

async fn nav_js() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        NAV_JS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CmsClient;
    use crate::config::{CmsConfig, SiteConfig};
    use crate::content::markdown::MarkdownRenderer;
    use crate::store::ContentStore;
    use crate::templates::TemplateRenderer;

    fn test_blog() -> Blog {
        let config = CmsConfig::new("test-bucket", "test-key", "http://localhost:9");
        Blog {
            site: SiteConfig::default(),
            store: ContentStore::new(CmsClient::new(config).unwrap()),
            templates: TemplateRenderer::new().unwrap(),
            markdown: MarkdownRenderer::new(),
        }
    }

    #[test]
    fn test_not_found_page_status() {
        let blog = test_blog();
        let response = not_found_page(&blog).unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_page_error_debug_format() {
        let err = PageError::Render(anyhow::anyhow!("template exploded"));
        assert!(format!("{:?}", err).contains("template exploded"));
    }
}
