//! Error type shared by the router core and the browser layer.

/// Everything that can go wrong while viewing documents.
///
/// None of these are fatal: a failed document shows the error affordance,
/// a failed sidebar leaves the chapter index empty, and a misconfiguration
/// disables the feature it concerns.
#[derive(Debug, Clone, PartialEq)]
pub enum DittoError {
    /// The requested document could not be fetched
    DocumentFetch { path: String, reason: String },
    /// The sidebar document could not be fetched
    SidebarFetch { path: String, reason: String },
    /// Edit button enabled without a `base_url`
    MissingBaseUrl,
    /// Configuration value rejected while deserializing
    InvalidConfig(String),
    /// A page element was missing or a DOM call failed
    Dom(String),
    /// The key-value store refused a read or write
    Storage(String),
}

impl std::fmt::Display for DittoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DittoError::DocumentFetch { path, reason } => {
                write!(f, "Failed to fetch document {}: {}", path, reason)
            }
            DittoError::SidebarFetch { path, reason } => {
                write!(f, "Failed to fetch sidebar {}: {}", path, reason)
            }
            DittoError::MissingBaseUrl => {
                write!(f, "Error! You didn't set 'base_url' when calling ditto.run()!")
            }
            DittoError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            DittoError::Dom(msg) => write!(f, "DOM error: {}", msg),
            DittoError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for DittoError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_url_message_matches_alert() {
        assert_eq!(
            DittoError::MissingBaseUrl.to_string(),
            "Error! You didn't set 'base_url' when calling ditto.run()!"
        );
    }

    #[test]
    fn test_fetch_error_names_path() {
        let err = DittoError::DocumentFetch {
            path: "guide/setup.md".into(),
            reason: "404".into(),
        };
        assert!(err.to_string().contains("guide/setup.md"));
    }
}
