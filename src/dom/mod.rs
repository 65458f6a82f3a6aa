//! Page representation
//!
//! This module provides the owned element tree the extractors walk. It includes:
//! - ElementNode: Representation of DOM elements and text runs
//! - DomTree: Document title plus the body tree, loadable from HTML, JSON or a browser tab
//! - ElementHandle: Stable reference to an element, stored by the callback registry

pub mod element;
pub mod handle;
pub mod tree;

pub use element::{ElementNode, TEXT_NODE};
pub use handle::ElementHandle;
pub use tree::DomTree;
