//! Anti-forgery token discovery in server-rendered markup

use std::sync::LazyLock;

use regex::Regex;

static META_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta\s+name=["']csrf-token["']\s+content=["']([^"']+)["']"#)
        .expect("valid csrf meta regex")
});

static INPUT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*\bname=["']csrf_token["'][^>]*\bvalue=["']([^"']+)["']"#)
        .expect("valid csrf input regex")
});

/// Find an anti-forgery token in an HTML document or fragment
///
/// Looks for `<meta name="csrf-token" content="...">` first, then a hidden
/// form field named `csrf_token`.
pub fn extract_csrf_token(html: &str) -> Option<String> {
    META_TOKEN
        .captures(html)
        .or_else(|| INPUT_TOKEN.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
