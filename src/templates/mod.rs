//! Embedded page templates
//!
//! All templates are compiled into the binary and rendered with Tera.
//! Autoescaping stays on; the only raw insertion is the markdown-rendered
//! post body, marked `safe` at the call site in `post.html`.

use anyhow::Result;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::helpers::{date, img};

/// Template renderer with the embedded blog theme.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded.
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("blog/layout.html")),
            ("home.html", include_str!("blog/home.html")),
            ("post.html", include_str!("blog/post.html")),
            ("author.html", include_str!("blog/author.html")),
            ("category.html", include_str!("blog/category.html")),
            ("not_found.html", include_str!("blog/not_found.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("blog/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("blog/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("blog/partials/post_card.html"),
            ),
            (
                "partials/category_badge.html",
                include_str!("blog/partials/category_badge.html"),
            ),
        ])?;

        tera.register_filter("imgix", imgix_filter);
        tera.register_filter("date_format", date_format_filter);
        tera.register_filter("excerpt", excerpt_filter);

        Ok(Self { tera })
    }

    /// Render a template with the given context.
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: append imgix transform parameters to an image URL.
///
/// Usage: `{{ image.imgix_url | imgix(w=800, h=450) }}`
fn imgix_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let url = tera::try_get_value!("imgix", "value", String, value);
    let width = args.get("w").and_then(|v| v.as_u64()).unwrap_or(800) as u32;
    let height = args.get("h").and_then(|v| v.as_u64()).unwrap_or(450) as u32;
    Ok(tera::Value::String(img::transform(&url, width, height)))
}

/// Tera filter: format a raw publish date as "Mar 1, 2024".
///
/// Unparseable values render as an empty string.
fn date_format_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let raw = tera::try_get_value!("date_format", "value", String, value);
    Ok(tera::Value::String(
        date::format_short(&raw).unwrap_or_default(),
    ))
}

/// Tera filter: strip HTML tags and truncate to `len` characters.
fn excerpt_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("excerpt", "value", String, value);
    let len = args.get("len").and_then(|v| v.as_u64()).unwrap_or(160) as usize;

    let mut stripped = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => stripped.push(c),
            _ => {}
        }
    }

    let truncated: String = if stripped.chars().count() > len {
        let mut out: String = stripped.chars().take(len).collect();
        out.push('…');
        out
    } else {
        stripped
    };

    Ok(tera::Value::String(truncated))
}
