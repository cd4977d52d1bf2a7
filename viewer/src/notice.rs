//! Queue for pending toast notices.
//!
//! Producers push fire-and-forget; the host UI drains with `take` each
//! frame and renders what it gets. Repeat events produce repeat notices:
//! two identical copies mean two toasts.

use std::mem;

use sage_types::Notice;

#[derive(Debug, Default)]
pub struct NoticeQueue {
    pending: Vec<Notice>,
}

impl NoticeQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        self.pending.push(notice);
    }

    /// Take all pending notices in arrival order, clearing the queue.
    pub fn take(&mut self) -> Vec<Notice> {
        mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }
}
