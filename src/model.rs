//! The serializable navigation model handed to the native host
//!
//! Field names on the wire follow the host shell's contract (`nav`, `menu`,
//! `actions`, `tabs`, `callback`), not the Rust field names.

use crate::error::NavError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Navigation affordance shown in the native bar
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NavigationMode {
    #[default]
    None,
    Back,
    Menu,
    Cancel,
}

impl NavigationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationMode::None => "none",
            NavigationMode::Back => "back",
            NavigationMode::Menu => "menu",
            NavigationMode::Cancel => "cancel",
        }
    }
}

impl FromStr for NavigationMode {
    type Err = NavError;

    /// Case-insensitive parse of a `data-nav` value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(NavigationMode::None),
            "back" => Ok(NavigationMode::Back),
            "menu" => Ok(NavigationMode::Menu),
            "cancel" => Ok(NavigationMode::Cancel),
            other => Err(NavError::InvalidNavigation(other.to_string())),
        }
    }
}

impl fmt::Display for NavigationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A popup menu entry, toolbar action or tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub disabled: bool,

    /// Tabs only: the tab marked current in the page
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,

    /// Key into the callback registry
    #[serde(rename = "callback")]
    pub callback_id: String,
}

pub type MenuItem = NavItem;
pub type ActionItem = NavItem;

impl NavItem {
    /// Everything except the callback id, for comparing models across build passes
    pub fn content(&self) -> (&str, Option<&str>, bool, bool) {
        (&self.label, self.icon.as_deref(), self.disabled, self.selected)
    }
}

/// Composite description of a page's native chrome
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NavigationModel {
    pub title: String,

    #[serde(rename = "nav", default)]
    pub navigation_mode: NavigationMode,

    #[serde(rename = "menu", default)]
    pub popup_menu_items: Vec<MenuItem>,

    #[serde(rename = "actions", default)]
    pub toolbar_actions: Vec<ActionItem>,

    #[serde(rename = "tabs", default)]
    pub tab_items: Vec<ActionItem>,
}

impl NavigationModel {
    /// All items in model order: menu, actions, tabs
    pub fn items(&self) -> impl Iterator<Item = &NavItem> {
        self.popup_menu_items
            .iter()
            .chain(&self.toolbar_actions)
            .chain(&self.tab_items)
    }

    pub fn callback_ids(&self) -> Vec<&str> {
        self.items().map(|item| item.callback_id.as_str()).collect()
    }

    /// Compare two models ignoring callback ids
    pub fn same_content(&self, other: &NavigationModel) -> bool {
        fn contents(items: &[NavItem]) -> Vec<(&str, Option<&str>, bool, bool)> {
            items.iter().map(NavItem::content).collect()
        }

        self.title == other.title
            && self.navigation_mode == other.navigation_mode
            && contents(&self.popup_menu_items) == contents(&other.popup_menu_items)
            && contents(&self.toolbar_actions) == contents(&other.toolbar_actions)
            && contents(&self.tab_items) == contents(&other.tab_items)
    }
}
