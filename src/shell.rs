//! Lifecycle facade tying the registry, the builder and a gateway together

use crate::bridge::BridgeGateway;
use crate::builder::{BuildOptions, BuildReport, PageModelBuilder};
use crate::callbacks::{Activator, CallbackRegistry, Dispatched, Outcome};
use crate::dom::DomTree;
use crate::error::Result;

/// Owns the callback registry for one hosted web view
pub struct NavShell<G: BridgeGateway> {
    gateway: G,
    registry: CallbackRegistry,
    options: BuildOptions,
}

impl<G: BridgeGateway> NavShell<G> {
    /// Create a shell drawing callback ids from the process-wide counter
    pub fn new(gateway: G) -> Self {
        Self::with_registry(gateway, CallbackRegistry::new())
    }

    pub fn with_registry(gateway: G, registry: CallbackRegistry) -> Self {
        Self {
            gateway,
            registry,
            options: BuildOptions::default(),
        }
    }

    /// Builder method: set the options used by [`NavShell::set_application_menus`]
    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    /// Tell the host to prepare its native bar
    pub fn initialize(&mut self) {
        log::debug!("Initializing native navigation");
        self.gateway.init();
    }

    pub fn show(&mut self) {
        self.gateway.show();
    }

    pub fn hide(&mut self) {
        self.gateway.hide();
    }

    /// Build the page's navigation model with the shell's options and send it to the host
    pub fn set_application_menus(&mut self, tree: &mut DomTree, root: Option<&[usize]>) -> Result<BuildReport> {
        let options = self.options.clone();
        self.set_application_menus_with(tree, root, &options)
    }

    pub fn set_application_menus_with(
        &mut self,
        tree: &mut DomTree,
        root: Option<&[usize]>,
        options: &BuildOptions,
    ) -> Result<BuildReport> {
        PageModelBuilder::new(&mut self.registry).build(tree, root, options, &mut self.gateway)
    }

    /// Inbound path: the host reports that the user activated a native item
    pub fn dispatch(&self, callback_id: &str, outcome: Outcome, activator: &mut dyn Activator) -> Dispatched {
        self.registry.dispatch(callback_id, outcome, activator)
    }

    pub fn registry(&self) -> &CallbackRegistry {
        &self.registry
    }

    /// Mutable access, e.g. for [`CallbackRegistry::prune_before`]
    pub fn registry_mut(&mut self) -> &mut CallbackRegistry {
        &mut self.registry
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn gateway_mut(&mut self) -> &mut G {
        &mut self.gateway
    }
}
