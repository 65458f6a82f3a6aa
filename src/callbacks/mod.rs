//! Callback registry
//!
//! Items in a [`NavigationModel`](crate::model::NavigationModel) carry only an
//! opaque callback id. The registry maps those ids back to the element that
//! should be activated when the native host reports a tap.

pub mod ids;
pub mod registry;

pub use ids::{IdGenerator, ProcessCounter, SequentialIds};
pub use registry::{CallbackEntry, CallbackRegistry};

use crate::dom::ElementHandle;
use crate::error::{NavError, Result};
use std::sync::Arc;

/// Continuation fired when the host acknowledges a command
pub type SuccessHandler = Arc<dyn Fn() + Send + Sync>;

/// Continuation fired with the failure of a command or an activation
pub type ErrorHandler = Arc<dyn Fn(&NavError) + Send + Sync>;

/// Something that can perform the in-page activation of an element
pub trait Activator {
    fn activate(&mut self, target: &ElementHandle) -> Result<()>;
}

/// Kind of item a callback belongs to; determines the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    MenuClick,
    ActionClick,
    TabClick,
}

impl CallbackKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            CallbackKind::MenuClick => "MenuClick",
            CallbackKind::ActionClick => "ActionClick",
            CallbackKind::TabClick => "TabClick",
        }
    }
}

/// What the host reports for a callback id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user activated the native item
    Success,
    /// The host failed; the payload is passed to the error handler
    Failure(String),
}

/// Result of a [`CallbackRegistry::dispatch`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatched {
    Activated,
    ErrorReported,
    /// The id is not registered; nothing ran
    Missed,
}
