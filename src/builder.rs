//! Assembles a [`NavigationModel`] from a page and hands it to the bridge

use crate::bridge::BridgeGateway;
use crate::callbacks::{CallbackRegistry, ErrorHandler, SuccessHandler};
use crate::dom::{DomTree, ElementHandle};
use crate::error::{NavError, Result};
use crate::extract::{self, Diagnostic, ExtractionContext, Region};
use crate::model::NavigationModel;
use std::fmt;
use std::sync::Arc;

/// Continuations and flags for one build
#[derive(Clone)]
pub struct BuildOptions {
    /// Fired when the host acknowledges the update
    pub on_success: SuccessHandler,

    /// Fired with host failures and with activation failures of registered items
    pub on_error: ErrorHandler,

    /// Ask the host to drop previously installed items before applying this model
    pub force: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            on_success: Arc::new(|| {}),
            on_error: Arc::new(|err: &NavError| log::error!("Navigation bridge error: {}", err)),
            force: false,
        }
    }
}

impl BuildOptions {
    /// Create new BuildOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the success continuation
    pub fn on_success(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_success = Arc::new(handler);
        self
    }

    /// Builder method: set the error continuation
    pub fn on_error(mut self, handler: impl Fn(&NavError) + Send + Sync + 'static) -> Self {
        self.on_error = Arc::new(handler);
        self
    }

    /// Builder method: set force mode
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl fmt::Debug for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildOptions")
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

/// What a build did, besides handing the model off
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Registry pass the callbacks were registered under
    pub pass: u64,

    /// Callback ids registered by this build, in model order
    pub callback_ids: Vec<String>,

    /// Header and footer elements that were hidden
    pub suppressed: Vec<ElementHandle>,

    pub diagnostics: Vec<Diagnostic>,
}

/// Runs the extractors against a page
pub struct PageModelBuilder<'r> {
    registry: &'r mut CallbackRegistry,
}

impl<'r> PageModelBuilder<'r> {
    pub fn new(registry: &'r mut CallbackRegistry) -> Self {
        Self { registry }
    }

    /// Extract the model for the page under `root`, without side effects on the page
    ///
    /// `root` is a child-index path from the document body; `None` means the body itself.
    pub fn extract(
        &mut self,
        tree: &DomTree,
        root: Option<&[usize]>,
        on_error: ErrorHandler,
    ) -> Result<(NavigationModel, Regions, Vec<Diagnostic>)> {
        let page = root_region(tree, root)?;
        Ok(self.extract_region(tree, page, on_error))
    }

    fn extract_region(
        &mut self,
        tree: &DomTree,
        page: Region<'_>,
        on_error: ErrorHandler,
    ) -> (NavigationModel, Regions, Vec<Diagnostic>) {
        let header = page.find_first(|n| n.is_tag("header"));
        let footer = page.find_first(|n| n.is_tag("footer"));

        let header_menu = header.as_ref().and_then(|h| h.find_first(|n| n.is_menu_of_type("popup")));
        let document_menu = document_popup_menu(tree);
        let header_toolbar = header.as_ref().and_then(|h| h.find_first(|n| n.is_menu_of_type("toolbar")));
        let footer_toolbar = footer.as_ref().and_then(|f| f.find_first(|n| n.is_menu_of_type("toolbar")));

        let mut ctx = ExtractionContext::new(&mut *self.registry, on_error);
        let header_node = header.as_ref().map(|h| h.node);

        let title = extract::extract_title(&tree.title, header_node);
        let navigation_mode = extract::extract_navigation_mode(header_node, &mut ctx);
        let popup_menu_items =
            extract::extract_popup_menu(tree, header_menu.as_ref(), document_menu.as_ref(), &mut ctx);
        let toolbar_actions = extract::extract_toolbar_actions(tree, header_toolbar.as_ref(), &mut ctx);
        let tab_items = extract::extract_tab_items(tree, footer_toolbar.as_ref(), &mut ctx);

        let model = NavigationModel {
            title,
            navigation_mode,
            popup_menu_items,
            toolbar_actions,
            tab_items,
        };

        let regions = Regions {
            header: header.map(|h| h.path),
            footer: footer.map(|f| f.path),
        };

        (model, regions, ctx.into_diagnostics())
    }

    /// Extract, hide the header and footer, and send the model to the host
    pub fn build<G>(
        &mut self,
        tree: &mut DomTree,
        root: Option<&[usize]>,
        options: &BuildOptions,
        gateway: &mut G,
    ) -> Result<BuildReport>
    where
        G: BridgeGateway + ?Sized,
    {
        let page = root_region(tree, root)?;
        let pass = self.registry.begin_pass();
        let (model, regions, diagnostics) = self.extract_region(tree, page, options.on_error.clone());

        let suppressed = regions.suppress(tree);

        let callback_ids = model.callback_ids().into_iter().map(str::to_string).collect();
        log::debug!(
            "Built navigation model '{}' (pass {}, {} diagnostics)",
            model.title,
            pass,
            diagnostics.len()
        );

        gateway.update(model, options.force, options.on_success.clone(), options.on_error.clone());

        Ok(BuildReport {
            pass,
            callback_ids,
            suppressed,
            diagnostics,
        })
    }
}

/// Header and footer paths found by an extraction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Regions {
    pub header: Option<Vec<usize>>,
    pub footer: Option<Vec<usize>>,
}

impl Regions {
    /// Hide the regions in the tree and return handles to them
    pub fn suppress(&self, tree: &mut DomTree) -> Vec<ElementHandle> {
        let mut suppressed = Vec::new();
        for path in [&self.header, &self.footer].into_iter().flatten() {
            if let Some(node) = tree.node_at_mut(path) {
                node.suppress();
            }
            if let Some(handle) = tree.handle_for(path) {
                suppressed.push(handle);
            }
        }
        suppressed
    }
}

/// The element `root` points at; `None` means the document body
fn root_region<'t>(tree: &'t DomTree, root: Option<&[usize]>) -> Result<Region<'t>> {
    let root_path = root.unwrap_or(&[]);
    let root_node = tree
        .node_at(root_path)
        .ok_or_else(|| NavError::ElementNotFound(format!("No element at path {:?}", root_path)))?;
    Ok(Region::new(root_path.to_vec(), root_node))
}

/// The popup menu that is a direct child of the document body
fn document_popup_menu(tree: &DomTree) -> Option<Region<'_>> {
    tree.root
        .children
        .iter()
        .enumerate()
        .find(|(_, child)| child.is_menu_of_type("popup"))
        .map(|(i, child)| Region::new(vec![i], child))
}
