use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tag name used for text runs that sit between element siblings
pub const TEXT_NODE: &str = "#text";

/// Represents a DOM element node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ElementNode {
    /// HTML tag name (e.g., "header", "menu", "button"), or `#text` for a text run
    pub tag_name: String,

    /// Element attributes (e.g., id, type, label, data-nav)
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    /// Text content of the element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementNode>,

    /// Whether the element is currently displayed
    #[serde(default = "default_visible")]
    pub is_visible: bool,

    /// 1-based position among the element siblings of the source document,
    /// counting elements that were dropped while loading
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_index: Option<usize>,
}

fn default_visible() -> bool {
    true
}

impl ElementNode {
    /// Create a new ElementNode
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: HashMap::new(),
            text_content: None,
            children: Vec::new(),
            is_visible: true,
            element_index: None,
        }
    }

    /// Create a text run node
    pub fn text_node(text: impl Into<String>) -> Self {
        Self::new(TEXT_NODE).with_text(text)
    }

    /// Builder method: set attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    /// Builder method: set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(key, value);
        self
    }

    /// Builder method: set text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_content = Some(text.into());
        self
    }

    /// Builder method: set children
    pub fn with_children(mut self, children: Vec<ElementNode>) -> Self {
        self.children = children;
        self
    }

    /// Builder method: set visibility
    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.is_visible = visible;
        self
    }

    /// Add a single attribute
    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: ElementNode) {
        self.children.push(child);
    }

    /// Get attribute value by key
    pub fn get_attribute(&self, key: &str) -> Option<&String> {
        self.attributes.get(key)
    }

    /// Get attribute value by key, treating an empty value as unset
    pub fn non_empty_attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether the attribute is present at all (HTML boolean attribute semantics)
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Get element ID
    pub fn id(&self) -> Option<&String> {
        self.attributes.get("id").filter(|id| !id.is_empty())
    }

    /// Check if element is a specific tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag_name.eq_ignore_ascii_case(tag)
    }

    pub fn is_text(&self) -> bool {
        self.tag_name == TEXT_NODE
    }

    fn is_blank_text(&self) -> bool {
        self.is_text() && self.text_content.as_deref().is_none_or(|t| t.trim().is_empty())
    }

    /// Check for `<menu type="...">` with the given type
    pub fn is_menu_of_type(&self, menu_type: &str) -> bool {
        self.is_tag("menu")
            && self
                .get_attribute("type")
                .is_some_and(|t| t.eq_ignore_ascii_case(menu_type))
    }

    /// Concatenated text of this node and all descendants, in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text_content {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First descendant (not self) matching the predicate, in document order
    pub fn find_first<P>(&self, predicate: P) -> Option<(Vec<usize>, &ElementNode)>
    where
        P: Fn(&ElementNode) -> bool,
    {
        let mut path = Vec::new();
        self.find_first_recursive(&predicate, &mut path)
    }

    fn find_first_recursive<'a, P>(
        &'a self,
        predicate: &P,
        path: &mut Vec<usize>,
    ) -> Option<(Vec<usize>, &'a ElementNode)>
    where
        P: Fn(&ElementNode) -> bool,
    {
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            if predicate(child) {
                return Some((path.clone(), child));
            }
            if let Some(found) = child.find_first_recursive(predicate, path) {
                return Some(found);
            }
            path.pop();
        }
        None
    }

    /// All descendants (not self) matching the predicate, in document order
    pub fn find_all<P>(&self, predicate: P) -> Vec<(Vec<usize>, &ElementNode)>
    where
        P: Fn(&ElementNode) -> bool,
    {
        let mut found = Vec::new();
        let mut path = Vec::new();
        self.find_all_recursive(&predicate, &mut path, &mut found);
        found
    }

    fn find_all_recursive<'a, P>(
        &'a self,
        predicate: &P,
        path: &mut Vec<usize>,
        found: &mut Vec<(Vec<usize>, &'a ElementNode)>,
    ) where
        P: Fn(&ElementNode) -> bool,
    {
        for (i, child) in self.children.iter().enumerate() {
            path.push(i);
            if predicate(child) {
                found.push((path.clone(), child));
            }
            child.find_all_recursive(predicate, path, found);
            path.pop();
        }
    }

    /// Resolve a child-index path relative to this node
    pub fn descendant(&self, path: &[usize]) -> Option<&ElementNode> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    /// Mutable variant of [`ElementNode::descendant`]
    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut ElementNode> {
        path.iter()
            .try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Hide the element without detaching it from the tree
    pub fn suppress(&mut self) {
        self.is_visible = false;
        let style = match self.attributes.get("style").map(|s| s.trim()) {
            Some(existing) if existing.contains("display: none") => return,
            Some(existing) if !existing.is_empty() => {
                format!("{}; display: none", existing.trim_end_matches(';'))
            }
            _ => "display: none".to_string(),
        };
        self.attributes.insert("style".to_string(), style);
    }

    /// Simplify element by removing unnecessary children (like scripts, styles)
    pub fn simplify(&mut self) {
        // Remove script, style, and noscript elements
        self.children.retain(|child| {
            !matches!(child.tag_name.as_str(), "script" | "style" | "noscript" | "template")
        });

        self.trim_blank_runs();

        // Recursively simplify children
        for child in &mut self.children {
            child.simplify();
        }
    }

    /// Drop whitespace-only text runs before the first and after the last element child
    ///
    /// Runs between element siblings are kept, they are part of `textContent`.
    pub fn trim_blank_runs(&mut self) {
        if self.children.iter().all(ElementNode::is_text) {
            return;
        }
        while self.children.last().is_some_and(ElementNode::is_blank_text) {
            self.children.pop();
        }
        let leading = self.children.iter().take_while(|c| c.is_blank_text()).count();
        self.children.drain(..leading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_header() -> ElementNode {
        ElementNode::new("header")
            .with_attribute("data-nav", "back")
            .with_children(vec![
                ElementNode::new("h1").with_text("Inbox"),
                ElementNode::new("menu")
                    .with_attribute("type", "toolbar")
                    .with_children(vec![
                        ElementNode::new("button").with_text("Compose"),
                        ElementNode::new("a").with_children(vec![
                            ElementNode::text_node("Search "),
                            ElementNode::new("b").with_text("all"),
                        ]),
                    ]),
            ])
    }

    #[test]
    fn test_element_node_creation() {
        let mut attrs = HashMap::new();
        attrs.insert("id".to_string(), "test-id".to_string());
        attrs.insert("label".to_string(), "Settings".to_string());

        let element = ElementNode::new("menuitem")
            .with_attributes(attrs)
            .with_text("ignored")
            .with_visibility(false);

        assert_eq!(element.tag_name, "menuitem");
        assert_eq!(element.id(), Some(&"test-id".to_string()));
        assert_eq!(element.get_attribute("label"), Some(&"Settings".to_string()));
        assert!(!element.is_visible);
    }

    #[test]
    fn test_non_empty_attribute() {
        let element = ElementNode::new("header")
            .with_attribute("data-title", "")
            .with_attribute("title", "Mail");

        assert_eq!(element.non_empty_attribute("data-title"), None);
        assert_eq!(element.non_empty_attribute("title"), Some("Mail"));
        assert!(element.has_attribute("data-title"));
    }

    #[test]
    fn test_is_menu_of_type() {
        let popup = ElementNode::new("MENU").with_attribute("type", "Popup");
        assert!(popup.is_menu_of_type("popup"));
        assert!(!popup.is_menu_of_type("toolbar"));
        assert!(!ElementNode::new("menu").is_menu_of_type("popup"));
    }

    #[test]
    fn test_text_in_document_order() {
        let header = create_header();
        assert_eq!(header.text(), "InboxComposeSearch all");
    }

    #[test]
    fn test_find_first_and_all() {
        let header = create_header();

        let (path, toolbar) = header.find_first(|n| n.is_menu_of_type("toolbar")).unwrap();
        assert_eq!(path, vec![1]);
        assert!(toolbar.is_tag("menu"));

        let links = header.find_all(|n| n.is_tag("a") || n.is_tag("button"));
        let paths: Vec<_> = links.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths, vec![vec![1, 0], vec![1, 1]]);

        assert!(header.find_first(|n| n.is_tag("header")).is_none());
    }

    #[test]
    fn test_descendant() {
        let mut header = create_header();
        assert!(header.descendant(&[1, 1, 1]).unwrap().is_tag("b"));
        assert!(header.descendant(&[4]).is_none());

        header.descendant_mut(&[0]).unwrap().add_attribute("id", "t");
        assert_eq!(header.children[0].id(), Some(&"t".to_string()));
    }

    #[test]
    fn test_suppress() {
        let mut footer = ElementNode::new("footer").with_attribute("style", "color: red;");
        footer.suppress();
        assert!(!footer.is_visible);
        assert_eq!(footer.get_attribute("style").unwrap(), "color: red; display: none");

        footer.suppress();
        assert_eq!(footer.get_attribute("style").unwrap(), "color: red; display: none");

        let mut header = ElementNode::new("header");
        header.suppress();
        assert_eq!(header.get_attribute("style").unwrap(), "display: none");
    }

    #[test]
    fn test_simplify() {
        let mut parent = ElementNode::new("div");
        parent.add_child(ElementNode::new("p").with_text("Content"));
        parent.add_child(ElementNode::new("script").with_text("alert('test')"));
        parent.add_child(ElementNode::new("style").with_text(".test { color: red; }"));
        parent.add_child(ElementNode::new("span").with_text("More content"));

        parent.simplify();

        assert_eq!(parent.children.len(), 2);
        assert!(parent.children[0].is_tag("p"));
        assert!(parent.children[1].is_tag("span"));
    }

    #[test]
    fn test_trim_blank_runs() {
        let mut link = ElementNode::new("a").with_children(vec![
            ElementNode::text_node("\n  "),
            ElementNode::new("span").with_text("New"),
            ElementNode::text_node(" "),
            ElementNode::new("span").with_text("Mail"),
            ElementNode::text_node("\n"),
        ]);

        link.trim_blank_runs();
        assert_eq!(link.children.len(), 3);
        assert_eq!(link.text(), "New Mail");

        let mut only_text = ElementNode::new("p").with_children(vec![ElementNode::text_node(" ")]);
        only_text.trim_blank_runs();
        assert_eq!(only_text.children.len(), 1);
    }

    #[test]
    fn test_serialization() {
        let element = create_header();

        let json = serde_json::to_string(&element).unwrap();
        let deserialized: ElementNode = serde_json::from_str(&json).unwrap();

        assert_eq!(element, deserialized);
    }

    #[test]
    fn test_deserialize_defaults_visible() {
        let node: ElementNode = serde_json::from_str(r#"{"tag_name": "footer"}"#).unwrap();
        assert!(node.is_visible);
        assert!(node.children.is_empty());
    }
}
