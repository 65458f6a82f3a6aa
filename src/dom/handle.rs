use serde::{Deserialize, Serialize};

/// Information needed to locate an element again after extraction
///
/// A handle stays valid for as long as the tree keeps its shape. The child-index
/// `path` is authoritative for in-memory trees; `css_selector` is what a live
/// browser page is queried with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ElementHandle {
    /// Child indices from the document root
    pub path: Vec<usize>,

    /// CSS selector for the element
    pub css_selector: String,

    /// Element's tag name
    pub tag_name: String,

    /// Element's ID attribute (if any)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Element's text content (truncated for display)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ElementHandle {
    /// Create a new ElementHandle with a path and CSS selector
    pub fn new(path: Vec<usize>, css_selector: impl Into<String>, tag_name: impl Into<String>) -> Self {
        Self {
            path,
            css_selector: css_selector.into(),
            tag_name: tag_name.into(),
            id: None,
            text: None,
        }
    }

    /// Builder method: set ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set text preview, truncated to 50 characters
    pub fn with_text(mut self, text: &str) -> Self {
        let text = text.trim();
        let truncated = if text.chars().count() > 50 {
            format!("{}...", text.chars().take(47).collect::<String>())
        } else {
            text.to_string()
        };
        self.text = Some(truncated);
        self
    }
}
