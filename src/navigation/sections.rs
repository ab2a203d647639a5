//! SectionIndex: heading slugs and the in-page outline
//!
//! Rebuilt from scratch on every render. Headings at levels 2 through 4 get
//! a slug used as their element id; only level 2 headings are listed in the
//! outline.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

pub const MIN_LEVEL: u8 = 2;
pub const MAX_LEVEL: u8 = 4;
/// Only this level is materialised into the outline
pub const OUTLINE_LEVEL: u8 = 2;
pub const SEPARATOR: char = '_';

/// Whitespace plus punctuation that is unsafe inside ids, selectors or fragments
const SYMBOL_PATTERN: &str = r#"[&/\\#,+=()$~%.'":*?<>{}\s\[\]]"#;

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(SYMBOL_PATTERN).expect("symbol pattern is a valid regex"))
}

/// Replace every symbol character with [`SEPARATOR`]
pub fn slugify(text: &str) -> String {
    symbol_re()
        .replace_all(text.trim(), SEPARATOR.to_string().as_str())
        .into_owned()
}

/// A heading found in rendered content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading_level: u8,
    pub slug: String,
    pub display_text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    /// Build from headings in document order.
    ///
    /// Headings outside levels 2..=4 are ignored. A repeated slug gets a
    /// numeric suffix (`Usage`, `Usage_2`, `Usage_3`) so ids stay unique.
    pub fn build<I>(headings: I) -> Self
    where
        I: IntoIterator<Item = Heading>,
    {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut sections = Vec::new();

        for heading in headings {
            if !(MIN_LEVEL..=MAX_LEVEL).contains(&heading.level) {
                continue;
            }
            let base = slugify(&heading.text);
            let mut slug = base.clone();
            if let Some(mut count) = seen.get(&base).copied() {
                loop {
                    count += 1;
                    let candidate = format!("{}{}{}", base, SEPARATOR, count);
                    if !seen.contains_key(&candidate) {
                        seen.insert(base.clone(), count);
                        slug = candidate;
                        break;
                    }
                }
            }
            seen.insert(slug.clone(), 1);
            sections.push(Section {
                heading_level: heading.level,
                slug,
                display_text: heading.text.trim().to_string(),
            });
        }

        Self { sections }
    }

    /// All sections, document order
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Level 2 sections listed in the outline
    pub fn outline(&self) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|s| s.heading_level == OUTLINE_LEVEL)
            .collect()
    }

    pub fn find(&self, slug: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYMBOLS: &[char] = &[
        '&', '/', '\\', '#', ',', '+', '=', '(', ')', '$', '~', '%', '.', '\'', '"', ':', '*',
        '?', '<', '>', '{', '}', ' ', '\t', '[', ']',
    ];

    // -------------------------------------------------------------------------
    // Requirement 1: Symbols become the separator
    // -------------------------------------------------------------------------
    #[test]
    fn test_slugify_symbols() {
        assert_eq!(slugify("Installation"), "Installation");
        assert_eq!(slugify("Getting Started"), "Getting_Started");
        assert_eq!(slugify("What's new? (v2.0)"), "What_s_new___v2_0_");
        assert_eq!(slugify("a/b\\c#d"), "a_b_c_d");
    }

    #[test]
    fn test_slug_contains_no_symbols() {
        let texts = ["C++ & Rust: {fast}", "x = [1, 2]", "100% \"quoted\" <tag>", "~$*."];
        for text in texts {
            let slug = slugify(text);
            assert!(!slug.chars().any(|c| SYMBOLS.contains(&c)), "{}", slug);
        }
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("安装 指南"), "安装_指南");
        assert_eq!(slugify("  padded  "), "padded");
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Deterministic across builds
    // -------------------------------------------------------------------------
    #[test]
    fn test_build_deterministic() {
        let headings = || vec![Heading::new(2, "Setup"), Heading::new(3, "On Linux"), Heading::new(2, "Setup")];
        assert_eq!(SectionIndex::build(headings()), SectionIndex::build(headings()));
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Levels 2..=4 only, outline lists level 2 only
    // -------------------------------------------------------------------------
    #[test]
    fn test_levels_and_outline() {
        let index = SectionIndex::build(vec![
            Heading::new(1, "Title"),
            Heading::new(2, "Install"),
            Heading::new(3, "Linux"),
            Heading::new(4, "Debian"),
            Heading::new(5, "Too deep"),
            Heading::new(2, "Usage"),
        ]);
        assert_eq!(index.len(), 4);
        let outline: Vec<_> = index.outline().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(outline, vec!["Install", "Usage"]);
        assert_eq!(index.find("Debian").unwrap().heading_level, 4);
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Collisions get numeric suffixes
    // -------------------------------------------------------------------------
    #[test]
    fn test_collision_suffix() {
        let index = SectionIndex::build(vec![
            Heading::new(2, "Usage"),
            Heading::new(3, "Usage"),
            Heading::new(2, "Usage_2"),
            Heading::new(2, "Usage"),
        ]);
        let slugs: Vec<_> = index.sections().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["Usage", "Usage_2", "Usage_2_2", "Usage_3"]);
    }

    #[test]
    fn test_collision_counter_carries_over() {
        let index = SectionIndex::build((0..4).map(|_| Heading::new(2, "FAQ")));
        let slugs: Vec<_> = index.sections().iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, vec!["FAQ", "FAQ_2", "FAQ_3", "FAQ_4"]);
    }

    #[test]
    fn test_display_text_preserved() {
        let index = SectionIndex::build(vec![Heading::new(2, " Hello, World ")]);
        assert_eq!(index.sections()[0].display_text, "Hello, World");
        assert_eq!(index.sections()[0].slug, "Hello__World");
    }
}
