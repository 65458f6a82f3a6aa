use crate::callbacks::Activator;
use crate::dom::element::ElementNode;
use crate::dom::handle::ElementHandle;
use crate::error::{NavError, Result};
use headless_chrome::Tab;
use scraper::{ElementRef, Html, Node, Selector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A page snapshot: the document title plus the body element tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomTree {
    /// Value of the document's `<title>`
    #[serde(default)]
    pub title: String,

    /// Root element of the DOM tree (the document body)
    pub root: ElementNode,

    /// Elements activated through [`Activator::activate`], oldest first
    #[serde(skip)]
    pub activations: Vec<ElementHandle>,
}

impl DomTree {
    /// Create a new DomTree
    pub fn new(title: impl Into<String>, root: ElementNode) -> Self {
        Self {
            title: title.into(),
            root,
            activations: Vec::new(),
        }
    }

    /// Parse an HTML document
    pub fn from_html(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);

        let title_selector = parse_selector("title")?;
        let body_selector = parse_selector("body")?;

        let title = document
            .select(&title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let body = document
            .select(&body_selector)
            .next()
            .ok_or_else(|| NavError::DomParseFailed("Document has no body".to_string()))?;

        let mut root = convert_element(body);
        root.simplify();

        Ok(Self::new(title, root))
    }

    /// Parse a page snapshot in the `{"title": ..., "root": {...}}` form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| NavError::DomParseFailed(format!("Failed to parse DOM JSON: {}", e)))
    }

    /// Build DOM tree from a browser tab
    pub fn from_tab(tab: &Arc<Tab>) -> Result<Self> {
        let js_code = include_str!("extract_page.js");

        let result = tab
            .evaluate(js_code, false)
            .map_err(|e| NavError::DomParseFailed(format!("Failed to execute DOM extraction script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| NavError::DomParseFailed("No value returned from DOM extraction".to_string()))?;

        // The script returns a JSON string, so it is decoded twice
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| NavError::DomParseFailed(format!("Failed to get JSON string: {}", e)))?;

        Self::from_json(&json_str)
    }

    /// Convert the DOM tree to JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NavError::DomParseFailed(format!("Failed to serialize DOM to JSON: {}", e)))
    }

    /// Resolve a child-index path from the root
    pub fn node_at(&self, path: &[usize]) -> Option<&ElementNode> {
        self.root.descendant(path)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut ElementNode> {
        self.root.descendant_mut(path)
    }

    /// Path of the first element carrying the given id
    pub fn find_path_by_id(&self, id: &str) -> Option<Vec<usize>> {
        if self.root.id().is_some_and(|root_id| root_id == id) {
            return Some(Vec::new());
        }
        self.root
            .find_first(|n| n.id().is_some_and(|node_id| node_id == id))
            .map(|(path, _)| path)
    }

    /// Build an ElementHandle for the node at `path`
    pub fn handle_for(&self, path: &[usize]) -> Option<ElementHandle> {
        let node = self.node_at(path)?;

        let mut css_path = self.root.tag_name.clone();
        let mut current = &self.root;
        for &i in path {
            let child = current.children.get(i)?;
            // nth-child counts element siblings only, including ones dropped while loading
            let nth = child
                .element_index
                .unwrap_or_else(|| current.children[..=i].iter().filter(|c| !c.is_text()).count());
            css_path = format!("{} > {}:nth-child({})", css_path, child.tag_name, nth);
            current = child;
        }

        // Prefer ID selector if available
        let css_selector = match node.id() {
            Some(id) => format!("#{}", id),
            None => css_path,
        };

        let mut handle = ElementHandle::new(path.to_vec(), css_selector, &node.tag_name);

        if let Some(id) = node.id() {
            handle = handle.with_id(id);
        }

        let text = node.text();
        if !text.trim().is_empty() {
            handle = handle.with_text(&text);
        }

        Some(handle)
    }

    /// Count total elements in the tree
    pub fn count_elements(&self) -> usize {
        Self::count_elements_recursive(&self.root)
    }

    fn count_elements_recursive(node: &ElementNode) -> usize {
        let own = usize::from(!node.is_text());
        own + node.children.iter().map(Self::count_elements_recursive).sum::<usize>()
    }
}

impl Activator for DomTree {
    fn activate(&mut self, target: &ElementHandle) -> Result<()> {
        let node = self
            .node_at(&target.path)
            .filter(|node| node.is_tag(&target.tag_name))
            .ok_or_else(|| NavError::StaleElement(target.css_selector.clone()))?;

        log::debug!("Activating <{}> at {}", node.tag_name, target.css_selector);
        self.activations.push(target.clone());
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| NavError::DomParseFailed(format!("Invalid selector '{}': {:?}", selector, e)))
}

fn convert_element(element: ElementRef<'_>) -> ElementNode {
    let value = element.value();
    let mut node = ElementNode::new(value.name());

    for (key, val) in value.attrs() {
        node.add_attribute(key, val);
    }
    node.is_visible = !node.has_attribute("hidden");

    let mut element_index = 0;
    for child in element.children() {
        match child.value() {
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    element_index += 1;
                    let mut converted = convert_element(child_element);
                    converted.element_index = Some(element_index);
                    node.add_child(converted);
                }
            }
            Node::Text(text) => {
                let text: &str = text;
                if !text.is_empty() {
                    node.add_child(ElementNode::text_node(text));
                }
            }
            _ => {}
        }
    }
    node.trim_blank_runs();

    // A lone text run is folded into the element itself
    if node.children.len() == 1 && node.children[0].is_text() {
        node.text_content = node.children.pop().and_then(|t| t.text_content);
    }

    node
}
