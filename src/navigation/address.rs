//! Address parsing
//!
//! The location fragment has the shape `#<chapter>` or `#<chapter>#<anchor>`.
//! Parsing never fails: anything unrecognised degrades to the home chapter.

use serde::{Deserialize, Serialize};

/// Separates chapter from anchor inside the fragment
pub const DELIMITER: char = '#';

/// A (chapter, anchor) location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Chapter identifier. Empty means the home document.
    pub chapter: String,
    /// Heading slug inside the chapter
    pub anchor: Option<String>,
}

impl Address {
    pub fn new(chapter: impl Into<String>, anchor: Option<String>) -> Self {
        Self {
            chapter: chapter.into(),
            anchor,
        }
    }

    /// The home document with no anchor
    pub fn home() -> Self {
        Self::default()
    }

    /// Split a raw fragment without any reserved-prefix filtering.
    ///
    /// A single leading `#` is dropped, then the text is split on the first
    /// remaining `#`. Used for fragments this crate wrote itself.
    pub fn from_fragment(raw: &str) -> Self {
        let fragment = raw.strip_prefix(DELIMITER).unwrap_or(raw);
        match fragment.split_once(DELIMITER) {
            Some((chapter, anchor)) => Self {
                chapter: chapter.to_string(),
                anchor: Some(anchor.to_string()).filter(|a| !a.is_empty()),
            },
            None => Self {
                chapter: fragment.to_string(),
                anchor: None,
            },
        }
    }

    pub fn is_home(&self) -> bool {
        self.chapter.is_empty()
    }

    pub fn same_chapter(&self, other: &Address) -> bool {
        self.chapter == other.chapter
    }

    /// Fragment text without the leading `#`
    pub fn to_fragment(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}{}{}", self.chapter, DELIMITER, anchor),
            None => self.chapter.clone(),
        }
    }

    /// Directory component of the chapter (`guide/setup` -> `guide`)
    pub fn directory(&self) -> &str {
        match self.chapter.rfind('/') {
            Some(idx) => &self.chapter[..idx],
            None => "",
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.to_fragment())
    }
}

// =============================================================================
// AddressParser
// =============================================================================

/// Parses user-facing fragments, dropping anchors reserved for the comment widget
#[derive(Debug, Clone)]
pub struct AddressParser {
    reserved_prefix: String,
}

impl AddressParser {
    pub fn new(reserved_prefix: impl Into<String>) -> Self {
        Self {
            reserved_prefix: reserved_prefix.into(),
        }
    }

    pub fn parse(&self, raw: &str) -> Address {
        let mut address = Address::from_fragment(raw);
        if let Some(anchor) = &address.anchor {
            if !self.reserved_prefix.is_empty() && anchor.starts_with(&self.reserved_prefix) {
                address.anchor = None;
            }
        }
        address
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::new("comment-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Requirement 1: Empty fragment is the home chapter
    // -------------------------------------------------------------------------
    #[test]
    fn test_empty_fragment_is_home() {
        let parser = AddressParser::default();
        assert_eq!(parser.parse(""), Address::home());
        assert_eq!(parser.parse("#"), Address::home());
    }

    // -------------------------------------------------------------------------
    // Requirement 2: Split on the first delimiter
    // -------------------------------------------------------------------------
    #[test]
    fn test_chapter_and_anchor() {
        let parser = AddressParser::default();
        let address = parser.parse("#guide/setup#Installation");
        assert_eq!(address.chapter, "guide/setup");
        assert_eq!(address.anchor.as_deref(), Some("Installation"));
    }

    #[test]
    fn test_anchor_keeps_later_delimiters() {
        let address = Address::from_fragment("a#b#c");
        assert_eq!(address.chapter, "a");
        assert_eq!(address.anchor.as_deref(), Some("b#c"));
    }

    #[test]
    fn test_chapter_only() {
        let address = AddressParser::default().parse("#guide/setup");
        assert_eq!(address.chapter, "guide/setup");
        assert!(address.anchor.is_none());
    }

    #[test]
    fn test_trailing_delimiter_has_no_anchor() {
        let address = Address::from_fragment("#guide#");
        assert_eq!(address.chapter, "guide");
        assert!(address.anchor.is_none());
    }

    // -------------------------------------------------------------------------
    // Requirement 3: Bare anchor refers to the home chapter
    // -------------------------------------------------------------------------
    #[test]
    fn test_bare_anchor_is_home() {
        let address = AddressParser::default().parse("##Usage");
        assert!(address.is_home());
        assert_eq!(address.anchor.as_deref(), Some("Usage"));
    }

    // -------------------------------------------------------------------------
    // Requirement 4: Comment anchors are never navigable
    // -------------------------------------------------------------------------
    #[test]
    fn test_comment_anchor_ignored() {
        let address = AddressParser::default().parse("#guide/setup#comment-42");
        assert_eq!(address, Address::new("guide/setup", None));
    }

    #[test]
    fn test_empty_prefix_filters_nothing() {
        let address = AddressParser::new("").parse("#a#comment-1");
        assert_eq!(address.anchor.as_deref(), Some("comment-1"));
    }

    // -------------------------------------------------------------------------
    // Requirement 5: Fragment rendering
    // -------------------------------------------------------------------------
    #[test]
    fn test_to_fragment() {
        assert_eq!(Address::new("a/b", Some("X".into())).to_fragment(), "a/b#X");
        assert_eq!(Address::new("a/b", None).to_string(), "#a/b");
        assert_eq!(Address::from_fragment("a/b#X").to_fragment(), "a/b#X");
    }

    #[test]
    fn test_directory() {
        assert_eq!(Address::new("guide/setup", None).directory(), "guide");
        assert_eq!(Address::new("a/b/c", None).directory(), "a/b");
        assert_eq!(Address::new("setup", None).directory(), "");
    }
}
