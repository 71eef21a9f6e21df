//! Image transform URLs
//!
//! Entity images carry an `imgix_url` that accepts on-the-fly transform
//! query parameters. The site only ever appends parameters; the actual
//! resizing happens at the image CDN.

/// Append crop-and-compress transform parameters to an imgix URL.
///
/// # Examples
/// ```ignore
/// transform("https://imgix.example.com/a.jpg", 800, 450)
/// // -> "https://imgix.example.com/a.jpg?w=800&h=450&fit=crop&auto=format,compress"
/// ```
pub fn transform(imgix_url: &str, width: u32, height: u32) -> String {
    let sep = if imgix_url.contains('?') { '&' } else { '?' };
    format!(
        "{}{}w={}&h={}&fit=crop&auto=format,compress",
        imgix_url, sep, width, height
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        assert_eq!(
            transform("https://imgix.example.com/a.jpg", 800, 450),
            "https://imgix.example.com/a.jpg?w=800&h=450&fit=crop&auto=format,compress"
        );
    }

    #[test]
    fn test_transform_preserves_existing_query() {
        let url = transform("https://imgix.example.com/a.jpg?dpr=2", 80, 80);
        assert!(url.starts_with("https://imgix.example.com/a.jpg?dpr=2&w=80&h=80"));
    }
}
