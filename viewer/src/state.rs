//! Reference state sink backing a host UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use sage_engine::StateSink;
use sage_types::ChannelKind;

/// Shared view state the dispatcher writes into and the render loop reads.
///
/// Interior-mutable and lock-light so the render side can poll every frame
/// while a dispatch is in flight. Hosts with richer needs implement
/// [`StateSink`] themselves; this covers the common case.
#[derive(Debug, Default)]
pub struct ViewerState {
    explain_busy: AtomicBool,
    query_busy: AtomicBool,
    surface_open: AtomicBool,
    result: Mutex<String>,
    query_response: Mutex<String>,
}

impl ViewerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the triggering control for `channel` should be disabled.
    #[must_use]
    pub fn is_busy(&self, channel: ChannelKind) -> bool {
        match channel {
            ChannelKind::Explain => self.explain_busy.load(Ordering::Acquire),
            ChannelKind::Query => self.query_busy.load(Ordering::Acquire),
        }
    }

    #[must_use]
    pub fn is_surface_open(&self) -> bool {
        self.surface_open.load(Ordering::Acquire)
    }

    pub fn close_surface(&self) {
        self.surface_open.store(false, Ordering::Release);
    }

    /// Current explanation text (or fallback), cloned for rendering.
    #[must_use]
    pub fn result(&self) -> String {
        self.result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Current query response (or fallback), cloned for rendering.
    #[must_use]
    pub fn query_response(&self) -> String {
        self.query_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StateSink for ViewerState {
    fn set_busy(&self, channel: ChannelKind, busy: bool) {
        match channel {
            ChannelKind::Explain => self.explain_busy.store(busy, Ordering::Release),
            ChannelKind::Query => self.query_busy.store(busy, Ordering::Release),
        }
    }

    fn set_result(&self, text: &str) {
        *self.result.lock().unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }

    fn set_surface_open(&self, open: bool) {
        self.surface_open.store(open, Ordering::Release);
    }

    fn set_query_response(&self, text: &str) {
        *self
            .query_response
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = text.to_string();
    }
}
