//! # navshell
//!
//! Turns a web page's navigation markup into a model a native hybrid-app shell can render.
//!
//! ## Features
//!
//! - **Extraction**: title, navigation affordance, popup menu, toolbar actions and tabs
//!   from `<header>`, `<footer>` and `<menu>` markup
//! - **Callback Registry**: every interactive item gets an opaque callback id; the host
//!   reports taps back by id and the registry activates the source element
//! - **Bridge**: a narrow `init` / `update` / `show` / `hide` command channel to the host,
//!   with a JSON-lines implementation and an in-memory one
//! - **Chrome host**: load pages, hide regions and click elements through a Chrome tab
//!
//! ## Markup
//!
//! ```html
//! <header data-nav="back">
//!   <h1>Inbox</h1>
//!   <menu type="toolbar"><button icon="img/new.png">Compose</button></menu>
//!   <menu type="popup"><menuitem label="Settings"></menuitem></menu>
//! </header>
//! <footer>
//!   <menu type="toolbar"><a href="#inbox">Inbox</a><a href="#sent">Sent</a></menu>
//! </footer>
//! ```
//!
//! ## Library Usage
//!
//! ```rust
//! use navshell::{DomTree, NavShell, Outcome};
//! use navshell::bridge::MemoryGateway;
//!
//! # fn main() -> navshell::Result<()> {
//! let mut page = DomTree::from_html(
//!     r#"<header><h1>Inbox</h1><menu type="toolbar"><button>Compose</button></menu></header>"#,
//! )?;
//!
//! let mut shell = NavShell::new(MemoryGateway::new());
//! shell.initialize();
//! let report = shell.set_application_menus(&mut page, None)?;
//!
//! // Later, the host reports that "Compose" was tapped
//! shell.dispatch(&report.callback_ids[0], Outcome::Success, &mut page);
//! assert_eq!(page.activations.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`dom`]: Page tree, element handles and loaders (HTML, JSON, Chrome tab)
//! - [`model`]: The serializable navigation model
//! - [`extract`]: One extraction routine per navigation concept
//! - [`builder`]: Runs the extractors and hands the model to the bridge
//! - [`callbacks`]: Callback ids, registry and dispatch
//! - [`bridge`]: Host command channel
//! - [`shell`]: Lifecycle facade
//! - [`browser`]: Chrome host integration
//! - [`error`]: Error types and result aliases

pub mod bridge;
pub mod browser;
pub mod builder;
pub mod callbacks;
pub mod dom;
pub mod error;
pub mod extract;
pub mod model;
pub mod shell;

pub use bridge::{BridgeCommand, BridgeGateway, JsonGateway, MemoryGateway};
pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use builder::{BuildOptions, BuildReport, PageModelBuilder};
pub use callbacks::{Activator, CallbackKind, CallbackRegistry, Dispatched, Outcome};
pub use dom::{DomTree, ElementHandle, ElementNode};
pub use error::{NavError, Result};
pub use extract::Diagnostic;
pub use model::{ActionItem, MenuItem, NavItem, NavigationMode, NavigationModel};
pub use shell::NavShell;
