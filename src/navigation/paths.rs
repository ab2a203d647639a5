//! Path resolution: chapter -> fetchable document, and asset rewriting.

use super::address::Address;

pub const MARKDOWN_EXT: &str = ".md";

/// Fetch path for a chapter. The home chapter maps to the index document.
pub fn document_path(chapter: &str, index: &str) -> String {
    if chapter.is_empty() {
        index.to_string()
    } else {
        format!("{}{}", chapter, MARKDOWN_EXT)
    }
}

/// `http://`, `https://`, protocol-relative, `data:` and root-absolute sources
pub fn is_absolute_reference(src: &str) -> bool {
    if src.starts_with("//") || src.starts_with('/') || src.starts_with("data:") {
        return true;
    }
    match src.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Rewrite an image source embedded in `address`'s document so it resolves
/// against the fetch root. Returns `None` when the source must stay as is.
///
/// `./img/x.png` inside `guide/setup` becomes `guide/img/x.png`.
pub fn normalize_asset(address: &Address, src: &str) -> Option<String> {
    if src.is_empty() || is_absolute_reference(src) {
        return None;
    }
    let relative = src.strip_prefix("./").unwrap_or(src);
    let directory = address.directory();
    if directory.is_empty() {
        if relative == src {
            return None;
        }
        return Some(relative.to_string());
    }
    Some(format!("{}/{}", directory, relative))
}

/// External "edit this page" link for a chapter
pub fn edit_url(base_url: &str, address: &Address, index: &str) -> String {
    let page = if address.is_home() {
        index.strip_suffix(MARKDOWN_EXT).unwrap_or(index)
    } else {
        address.chapter.as_str()
    };
    format!(
        "{}/{}{}",
        base_url.trim_end_matches('/'),
        page.trim_start_matches('/'),
        MARKDOWN_EXT
    )
}

/// Search-engine redirect restricted to `site`.
///
/// `encode` percent-encodes the query value (the browser supplies
/// `encodeURIComponent`).
pub fn search_url<F>(engine: &str, site: Option<&str>, query: &str, encode: F) -> String
where
    F: Fn(&str) -> String,
{
    let query = query.trim();
    let q = match site.map(str::trim).filter(|s| !s.is_empty()) {
        Some(site) if query.is_empty() => format!("site:{}", site),
        Some(site) => format!("site:{} {}", site, query),
        None => query.to_string(),
    };
    format!("{}?q={}", engine, encode(&q))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(chapter: &str) -> Address {
        Address::new(chapter, None)
    }

    #[test]
    fn test_document_path() {
        assert_eq!(document_path("guide/setup", "README.md"), "guide/setup.md");
        assert_eq!(document_path("", "README.md"), "README.md");
    }

    #[test]
    fn test_relative_image_rewritten_to_chapter_dir() {
        let rewritten = normalize_asset(&at("guide/setup"), "./img/x.png");
        assert_eq!(rewritten.as_deref(), Some("guide/img/x.png"));

        let rewritten = normalize_asset(&at("guide/setup"), "img/x.png");
        assert_eq!(rewritten.as_deref(), Some("guide/img/x.png"));
    }

    #[test]
    fn test_network_references_untouched() {
        let address = at("guide/setup");
        assert_eq!(normalize_asset(&address, "https://cdn.example/x.png"), None);
        assert_eq!(normalize_asset(&address, "http://cdn.example/x.png"), None);
        assert_eq!(normalize_asset(&address, "//cdn.example/x.png"), None);
        assert_eq!(normalize_asset(&address, "data:image/png;base64,AAAA"), None);
        assert_eq!(normalize_asset(&address, "/static/x.png"), None);
    }

    #[test]
    fn test_top_level_chapter_has_no_prefix() {
        assert_eq!(normalize_asset(&at("setup"), "./x.png").as_deref(), Some("x.png"));
        assert_eq!(normalize_asset(&at("setup"), "x.png"), None);
        assert_eq!(normalize_asset(&Address::home(), "./img/a.png").as_deref(), Some("img/a.png"));
    }

    #[test]
    fn test_relative_path_with_colon_is_not_a_scheme() {
        assert!(!is_absolute_reference("img/a:b.png"));
        assert!(!is_absolute_reference("weird path://x"));
    }

    #[test]
    fn test_edit_url() {
        let url = edit_url("https://git.example/docs/", &at("guide/setup"), "README.md");
        assert_eq!(url, "https://git.example/docs/guide/setup.md");

        let url = edit_url("https://git.example/docs", &Address::home(), "README.md");
        assert_eq!(url, "https://git.example/docs/README.md");
    }

    #[test]
    fn test_edit_url_ignores_anchor() {
        let address = Address::new("guide", Some("Install".into()));
        assert_eq!(edit_url("https://x", &address, "README.md"), "https://x/guide.md");
    }

    #[test]
    fn test_search_url() {
        let encode = |s: &str| s.replace(' ', "%20").replace(':', "%3A");
        let url = search_url("https://www.google.com/search", Some("docs.example"), " rust  ", encode);
        assert_eq!(url, "https://www.google.com/search?q=site%3Adocs.example%20rust");

        let url = search_url("https://s", None, "wasm", |s| s.to_string());
        assert_eq!(url, "https://s?q=wasm");
    }
}
