//! Per-tab flow session state.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flags owned by one tab context and shared by every flow run in it.
///
/// Lives as long as the tab agent, so it survives page reloads.
#[derive(Debug, Default)]
pub struct FlowSession {
    processing: AtomicBool,
    reloaded_once: AtomicBool,
}

impl FlowSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session busy. Returns `None` if a flow is already running.
    ///
    /// The flag is cleared when the returned guard drops, on every exit path.
    pub fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard { session: self })
    }

    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    pub fn has_reloaded(&self) -> bool {
        self.reloaded_once.load(Ordering::Acquire)
    }

    /// Record a reload attempt. Returns `true` only for the first call.
    pub fn mark_reloaded(&self) -> bool {
        !self.reloaded_once.swap(true, Ordering::AcqRel)
    }
}

/// Holds the session's processing flag.
#[derive(Debug)]
pub struct ProcessingGuard<'a> {
    session: &'a FlowSession,
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.session.processing.store(false, Ordering::Release);
    }
}
