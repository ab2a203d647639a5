//! Viewer configuration
//!
//! A single immutable value handed to the router at start-up. Accepted from
//! JavaScript as a plain object or a JSON string; every field is optional.

use serde::{Deserialize, Serialize};

use crate::error::DittoError;

// =============================================================================
// DittoConfig
// =============================================================================

/// Page element selectors, feature switches and site settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DittoConfig {
    // ===== PAGE ELEMENTS =====
    /// Container the rendered document is written into
    pub content_id: String,
    pub sidebar_id: String,
    pub edit_id: String,
    pub back_to_top_id: String,
    pub loading_id: String,
    pub error_id: String,
    pub previous_id: String,
    pub next_id: String,
    /// Search form (must contain a text input)
    pub search_id: String,

    // ===== FEATURE SWITCHES =====
    /// Load `sidebar_file` and derive the chapter index from it
    pub sidebar: bool,
    pub edit_button: bool,
    pub back_to_top_button: bool,
    /// Persist scroll depth of the last viewed chapter
    pub save_progress: bool,
    pub search_bar: bool,

    // ===== SITE =====
    /// Document shown when the address names no chapter
    pub index: String,
    pub sidebar_file: String,
    /// Root of the external "edit this page" link
    pub base_url: Option<String>,
    /// Site-wide title, appended to every page title
    pub document_title: String,
    pub search_engine: String,
    /// Domain for the `site:` search operator. Falls back to the page host.
    pub site: Option<String>,
    /// Anchors with this prefix belong to the comment widget
    pub comment_prefix: String,
    /// Flash colour for a heading reached from the outline
    pub highlight_color: String,
}

impl Default for DittoConfig {
    fn default() -> Self {
        Self {
            content_id: "#content".to_string(),
            sidebar_id: "#sidebar".to_string(),
            edit_id: "#edit".to_string(),
            back_to_top_id: "#back_to_top".to_string(),
            loading_id: "#loading".to_string(),
            error_id: "#error".to_string(),
            previous_id: "#previous".to_string(),
            next_id: "#next".to_string(),
            search_id: "#search".to_string(),
            sidebar: true,
            edit_button: true,
            back_to_top_button: true,
            save_progress: false,
            search_bar: false,
            index: "README.md".to_string(),
            sidebar_file: "sidebar.md".to_string(),
            base_url: None,
            document_title: String::new(),
            search_engine: "https://www.google.com/search".to_string(),
            site: None,
            comment_prefix: "comment-".to_string(),
            highlight_color: "#ED1C24".to_string(),
        }
    }
}

impl DittoConfig {
    /// Parse from a JSON object; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, DittoError> {
        serde_json::from_str(json).map_err(|e| DittoError::InvalidConfig(e.to_string()))
    }

    /// Bare reader: document only, no sidebar or buttons
    pub fn minimal() -> Self {
        Self {
            sidebar: false,
            edit_button: false,
            back_to_top_button: false,
            ..Self::default()
        }
    }

    /// Every problem that should be reported at start-up.
    ///
    /// Problems are reported, never fatal; see [`DittoConfig::edit_enabled`].
    pub fn validate(&self) -> Vec<DittoError> {
        let mut problems = Vec::new();
        if self.edit_button && self.base_url_trimmed().is_none() {
            problems.push(DittoError::MissingBaseUrl);
        }
        problems
    }

    /// Edit button is shown only when it is both enabled and usable
    pub fn edit_enabled(&self) -> bool {
        self.edit_button && self.base_url_trimmed().is_some()
    }

    /// `base_url` without trailing slashes, `None` when unset or blank
    pub fn base_url_trimmed(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(|url| url.trim().trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_layout() {
        let config = DittoConfig::default();
        assert_eq!(config.content_id, "#content");
        assert_eq!(config.index, "README.md");
        assert!(config.sidebar);
        assert!(!config.save_progress);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DittoConfig::from_json(
            r#"{"save_progress": true, "document_title": "Docs", "base_url": "https://git.example/docs/"}"#,
        )
        .unwrap();
        assert!(config.save_progress);
        assert_eq!(config.document_title, "Docs");
        assert_eq!(config.sidebar_file, "sidebar.md");
        assert_eq!(config.base_url_trimmed(), Some("https://git.example/docs"));
    }

    #[test]
    fn test_from_json_rejects_wrong_type() {
        let err = DittoConfig::from_json(r#"{"sidebar": "yes"}"#).unwrap_err();
        assert!(matches!(err, DittoError::InvalidConfig(_)));
    }

    #[test]
    fn test_edit_without_base_url_is_reported() {
        let config = DittoConfig::default();
        assert_eq!(config.validate(), vec![DittoError::MissingBaseUrl]);
        assert!(!config.edit_enabled());
    }

    #[test]
    fn test_blank_base_url_counts_as_missing() {
        let config = DittoConfig {
            base_url: Some("  ".into()),
            ..DittoConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_minimal_has_no_problems() {
        let config = DittoConfig::minimal();
        assert!(config.validate().is_empty());
        assert!(!config.edit_enabled());
    }
}
