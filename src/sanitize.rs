//! HTML sanitization for proxied pages
//!
//! Strips the elements that execute code or trigger resource loads when the
//! proxied document is displayed: scripts, stylesheets, link tags, images and
//! media sources. Text content and the rest of the markup pass through.

use crate::error::GatewayError;
use lol_html::{element, rewrite_str, RewriteStrSettings};

/// Rewrite a raw HTML document into a display-safe one.
pub fn sanitize(raw: &str) -> Result<String, GatewayError> {
    rewrite_str(
        raw,
        RewriteStrSettings {
            element_content_handlers: vec![element!("script, style, link, img, source", |el| {
                el.remove();
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| GatewayError::Sanitize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_scripts() {
        let raw = "<html><head><script>alert(1)</script></head><body><p>hi</p></body></html>";
        let clean = sanitize(raw).unwrap();
        assert!(!clean.contains("<script"));
        assert!(!clean.contains("alert(1)"));
        assert!(clean.contains("<p>hi</p>"));
    }

    #[test]
    fn test_sanitize_strips_styles_and_links() {
        let raw = r#"<head><link rel="stylesheet" href="a.css"><style>p{color:red}</style></head>"#;
        let clean = sanitize(raw).unwrap();
        assert!(!clean.contains("<link"));
        assert!(!clean.contains("<style"));
    }

    #[test]
    fn test_sanitize_strips_media() {
        let raw = r#"<body><img src="x.png"><video><source src="x.mp4"></video></body>"#;
        let clean = sanitize(raw).unwrap();
        assert!(!clean.contains("<img"));
        assert!(!clean.contains("<source"));
        assert!(clean.contains("<video>"));
    }

    #[test]
    fn test_sanitize_keeps_structure_and_text() {
        let raw = "<html><body><h1>Title</h1><a href=\"/next\">next</a></body></html>";
        let clean = sanitize(raw).unwrap();
        assert_eq!(clean, raw);
    }
}
