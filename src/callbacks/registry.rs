use crate::callbacks::{
    Activator, CallbackKind, Dispatched, ErrorHandler, IdGenerator, Outcome, ProcessCounter,
};
use crate::dom::ElementHandle;
use crate::error::NavError;
use indexmap::IndexMap;
use std::fmt;

/// What runs when the host reports a callback id
#[derive(Clone)]
pub struct CallbackEntry {
    pub kind: CallbackKind,

    /// Element activated on success
    pub target: ElementHandle,

    /// Continuation for host-reported failures and activation errors
    pub on_error: ErrorHandler,

    /// Build pass that registered this entry
    pub pass: u64,
}

impl fmt::Debug for CallbackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEntry")
            .field("kind", &self.kind)
            .field("target", &self.target.css_selector)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

/// Map of callback ids to their entries
///
/// Append-only: entries from earlier build passes stay registered until the
/// host calls [`CallbackRegistry::prune_before`].
pub struct CallbackRegistry {
    /// Map from callback id to entry, in registration order
    entries: IndexMap<String, CallbackEntry>,

    ids: Box<dyn IdGenerator>,

    pass: u64,
}

impl CallbackRegistry {
    /// Create a registry drawing ids from the process-wide counter
    pub fn new() -> Self {
        Self::with_id_generator(ProcessCounter)
    }

    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            entries: IndexMap::new(),
            ids: Box::new(ids),
            pass: 0,
        }
    }

    /// Start a new build pass and return its number
    pub fn begin_pass(&mut self) -> u64 {
        self.pass += 1;
        self.pass
    }

    pub fn current_pass(&self) -> u64 {
        self.pass
    }

    /// Register a callback and return its freshly allocated id
    pub fn register(&mut self, kind: CallbackKind, target: ElementHandle, on_error: ErrorHandler) -> String {
        let mut id = format!("{}{}", kind.prefix(), self.ids.next_id());
        // Ids are never reused, even if the generator restarts
        while self.entries.contains_key(&id) {
            id = format!("{}{}", kind.prefix(), self.ids.next_id());
        }

        self.entries.insert(
            id.clone(),
            CallbackEntry {
                kind,
                target,
                on_error,
                pass: self.pass,
            },
        );
        id
    }

    /// Get entry by callback id
    pub fn get(&self, callback_id: &str) -> Option<&CallbackEntry> {
        self.entries.get(callback_id)
    }

    pub fn contains(&self, callback_id: &str) -> bool {
        self.entries.contains_key(callback_id)
    }

    /// Get the number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All callback ids, in registration order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CallbackEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Route a host report to the registered entry
    ///
    /// Never fails: an unknown id is logged and ignored, and an activation
    /// that cannot find its element goes to the entry's error handler.
    pub fn dispatch(&self, callback_id: &str, outcome: Outcome, activator: &mut dyn Activator) -> Dispatched {
        let Some(entry) = self.entries.get(callback_id) else {
            log::warn!("Ignoring unknown callback id {}", callback_id);
            return Dispatched::Missed;
        };

        match outcome {
            Outcome::Success => match activator.activate(&entry.target) {
                Ok(()) => {
                    log::debug!("{} activated {}", callback_id, entry.target.css_selector);
                    Dispatched::Activated
                }
                Err(e) => {
                    log::debug!("{} could not activate its target: {}", callback_id, e);
                    (entry.on_error)(&e);
                    Dispatched::ErrorReported
                }
            },
            Outcome::Failure(payload) => {
                (entry.on_error)(&NavError::Host(payload));
                Dispatched::ErrorReported
            }
        }
    }

    /// Drop every entry registered before `pass`; returns how many were removed
    pub fn prune_before(&mut self, pass: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.pass >= pass);
        before - self.entries.len()
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("entries", &self.entries)
            .field("pass", &self.pass)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::SequentialIds;
    use crate::error::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingActivator {
        activated: Vec<ElementHandle>,
        fail: bool,
    }

    impl Activator for CountingActivator {
        fn activate(&mut self, target: &ElementHandle) -> Result<()> {
            if self.fail {
                return Err(NavError::StaleElement(target.css_selector.clone()));
            }
            self.activated.push(target.clone());
            Ok(())
        }
    }

    fn counting_error_handler() -> (ErrorHandler, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let handler: ErrorHandler = Arc::new(move |_: &NavError| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        (handler, count)
    }

    fn handle(css: &str) -> ElementHandle {
        ElementHandle::new(vec![0], css, "button")
    }

    #[test]
    fn test_register_ids() {
        let mut registry = CallbackRegistry::with_id_generator(SequentialIds::default());
        let (on_error, _) = counting_error_handler();

        let a = registry.register(CallbackKind::MenuClick, handle("#a"), on_error.clone());
        let b = registry.register(CallbackKind::ActionClick, handle("#b"), on_error.clone());
        let c = registry.register(CallbackKind::TabClick, handle("#c"), on_error);

        assert_eq!(a, "MenuClick1");
        assert_eq!(b, "ActionClick2");
        assert_eq!(c, "TabClick3");
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["MenuClick1", "ActionClick2", "TabClick3"]);
    }

    #[test]
    fn test_register_skips_taken_ids() {
        let mut registry = CallbackRegistry::with_id_generator(SequentialIds::default());
        let (on_error, _) = counting_error_handler();

        let first = registry.register(CallbackKind::MenuClick, handle("#a"), on_error.clone());
        registry.ids = Box::new(SequentialIds::default());
        let second = registry.register(CallbackKind::MenuClick, handle("#b"), on_error);

        assert_eq!(first, "MenuClick1");
        assert_eq!(second, "MenuClick2");
    }

    #[test]
    fn test_dispatch_success_activates_once() {
        let mut registry = CallbackRegistry::new();
        let (on_error, errors) = counting_error_handler();
        let id = registry.register(CallbackKind::ActionClick, handle("#save"), on_error);

        let mut activator = CountingActivator::default();
        let result = registry.dispatch(&id, Outcome::Success, &mut activator);

        assert_eq!(result, Dispatched::Activated);
        assert_eq!(activator.activated.len(), 1);
        assert_eq!(activator.activated[0].css_selector, "#save");
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_failure_calls_error_handler() {
        let mut registry = CallbackRegistry::new();
        let (on_error, errors) = counting_error_handler();
        let id = registry.register(CallbackKind::TabClick, handle("#tab"), on_error);

        let mut activator = CountingActivator::default();
        let result = registry.dispatch(&id, Outcome::Failure("boom".to_string()), &mut activator);

        assert_eq!(result, Dispatched::ErrorReported);
        assert!(activator.activated.is_empty());
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_stale_target_reports_error() {
        let mut registry = CallbackRegistry::new();
        let (on_error, errors) = counting_error_handler();
        let id = registry.register(CallbackKind::MenuClick, handle("#gone"), on_error);

        let mut activator = CountingActivator { fail: true, ..Default::default() };
        assert_eq!(registry.dispatch(&id, Outcome::Success, &mut activator), Dispatched::ErrorReported);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unknown_id_is_noop() {
        let mut registry = CallbackRegistry::new();
        let (on_error, errors) = counting_error_handler();
        registry.register(CallbackKind::MenuClick, handle("#a"), on_error);

        let mut activator = CountingActivator::default();
        let result = registry.dispatch("MenuClick-unknown", Outcome::Success, &mut activator);

        assert_eq!(result, Dispatched::Missed);
        assert!(activator.activated.is_empty());
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_passes_and_prune() {
        let mut registry = CallbackRegistry::with_id_generator(SequentialIds::default());
        let (on_error, _) = counting_error_handler();

        assert_eq!(registry.begin_pass(), 1);
        let old = registry.register(CallbackKind::MenuClick, handle("#a"), on_error.clone());
        assert_eq!(registry.begin_pass(), 2);
        let new = registry.register(CallbackKind::MenuClick, handle("#a"), on_error);

        assert_eq!(registry.get(&old).unwrap().pass, 1);
        assert_eq!(registry.get(&new).unwrap().pass, 2);

        assert_eq!(registry.prune_before(2), 1);
        assert!(!registry.contains(&old));
        assert!(registry.contains(&new));
        assert_eq!(registry.current_pass(), 2);
    }
}
