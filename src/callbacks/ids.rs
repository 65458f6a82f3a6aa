use std::sync::atomic::{AtomicU64, Ordering};

/// Source of the numeric suffix appended to callback id prefixes
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> u64;
}

static PROCESS_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-wide counter shared by every registry using it; never repeats.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessCounter;

impl IdGenerator for ProcessCounter {
    fn next_id(&mut self) -> u64 {
        PROCESS_COUNTER.fetch_add(1, Ordering::Relaxed)
    }
}

/// Deterministic counter owned by a single registry
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}
