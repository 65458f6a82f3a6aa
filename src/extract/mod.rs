//! Extraction routines, one per navigation concept
//!
//! Each routine reads a located region of the page and produces part of the
//! [`NavigationModel`](crate::model::NavigationModel). Routines that create
//! interactive items register their callbacks through the shared
//! [`ExtractionContext`]. Bad markup never fails extraction: it falls back to a
//! safe default and leaves a [`Diagnostic`].

pub mod menu;
pub mod navigation;
pub mod title;
pub mod toolbar;

pub use menu::extract_popup_menu;
pub use navigation::extract_navigation_mode;
pub use title::extract_title;
pub use toolbar::{extract_tab_items, extract_toolbar_actions};

use crate::callbacks::{CallbackKind, CallbackRegistry, ErrorHandler};
use crate::dom::{DomTree, ElementHandle, ElementNode};
use std::fmt;

/// An element located in the page, with its path from the document root
#[derive(Debug, Clone, PartialEq)]
pub struct Region<'a> {
    pub path: Vec<usize>,
    pub node: &'a ElementNode,
}

impl<'a> Region<'a> {
    pub fn new(path: Vec<usize>, node: &'a ElementNode) -> Self {
        Self { path, node }
    }

    /// The whole document body
    pub fn document(tree: &'a DomTree) -> Self {
        Self::new(Vec::new(), &tree.root)
    }

    /// First descendant matching the predicate, like `querySelector`
    pub fn find_first<P>(&self, predicate: P) -> Option<Region<'a>>
    where
        P: Fn(&ElementNode) -> bool,
    {
        self.node
            .find_first(predicate)
            .map(|(rel, node)| Region::new(self.child_path(&rel), node))
    }

    /// All descendants matching the predicate, like `querySelectorAll`
    pub fn find_all<P>(&self, predicate: P) -> Vec<Region<'a>>
    where
        P: Fn(&ElementNode) -> bool,
    {
        self.node
            .find_all(predicate)
            .into_iter()
            .map(|(rel, node)| Region::new(self.child_path(&rel), node))
            .collect()
    }

    fn child_path(&self, rel: &[usize]) -> Vec<usize> {
        let mut path = self.path.clone();
        path.extend_from_slice(rel);
        path
    }
}

/// A recoverable anomaly found while reading the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `data-nav` held something other than none/back/menu/cancel
    InvalidNavigation { value: String },
    /// A `menuitem` without a `label` attribute
    MissingLabel { element: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::InvalidNavigation { value } => write!(f, "Invalid navigation type: {}", value),
            Diagnostic::MissingLabel { element } => write!(f, "Menu item {} has no label", element),
        }
    }
}

/// State shared by the extractors during one build pass
pub struct ExtractionContext<'r> {
    registry: &'r mut CallbackRegistry,
    on_error: ErrorHandler,
    diagnostics: Vec<Diagnostic>,
}

impl<'r> ExtractionContext<'r> {
    pub fn new(registry: &'r mut CallbackRegistry, on_error: ErrorHandler) -> Self {
        Self {
            registry,
            on_error,
            diagnostics: Vec::new(),
        }
    }

    /// Register a callback activating `target`, failing into the caller's error continuation
    pub fn register(&mut self, kind: CallbackKind, target: ElementHandle) -> String {
        self.registry.register(kind, target, self.on_error.clone())
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_paths_are_absolute() {
        let tree = DomTree::from_html(
            "<body><main><header><menu type='popup'><menuitem label='A'></menuitem></menu></header></main></body>",
        )
        .unwrap();

        let doc = Region::document(&tree);
        let header = doc.find_first(|n| n.is_tag("header")).unwrap();
        assert_eq!(header.path, vec![0, 0]);

        let items = header.find_all(|n| n.is_tag("menuitem"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].path, vec![0, 0, 0, 0]);
        assert!(tree.node_at(&items[0].path).unwrap().is_tag("menuitem"));
    }

    #[test]
    fn test_context_collects_diagnostics() {
        let mut registry = test_support::registry();
        let mut ctx = test_support::context(&mut registry);

        ctx.report(Diagnostic::InvalidNavigation { value: "sidebar".to_string() });
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].to_string(), "Invalid navigation type: sidebar");

        let id = ctx.register(CallbackKind::MenuClick, ElementHandle::new(vec![0], "#x", "menuitem"));
        assert_eq!(id, "MenuClick1");
        assert_eq!(ctx.into_diagnostics().len(), 1);
        assert!(registry.contains("MenuClick1"));
    }
}
