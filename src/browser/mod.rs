//! Host integration through a Chrome tab
//!
//! Loads the live page into a [`DomTree`](crate::dom::DomTree), mirrors header
//! and footer suppression back into the page, and performs activations as real
//! clicks.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
