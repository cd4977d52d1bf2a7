//! Key routing and overlay state for the free-form query surface.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key event means inside the query draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKeyAction {
    /// Submit the draft question.
    Submit,
    /// Insert a line break into the draft.
    InsertNewline,
    /// Not ours; let the host handle it.
    Pass,
}

/// Enter submits; Shift+Enter inserts a newline; everything else passes
/// through. Release and repeat events never submit.
#[must_use]
pub fn query_key_action(key: &KeyEvent) -> QueryKeyAction {
    if key.kind != KeyEventKind::Press {
        return QueryKeyAction::Pass;
    }
    match key.code {
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            QueryKeyAction::InsertNewline
        }
        KeyCode::Enter => QueryKeyAction::Submit,
        _ => QueryKeyAction::Pass,
    }
}

/// State of the free-form query overlay.
///
/// Closing the overlay discards both the draft question and the previous
/// response, so reopening always starts clean.
#[derive(Debug, Default)]
pub struct QuerySurface {
    open: bool,
    draft: String,
    response: String,
}

impl QuerySurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.draft.clear();
        self.response.clear();
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn push_newline(&mut self) {
        self.draft.push('\n');
    }

    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }

    pub fn set_response(&mut self, response: impl Into<String>) {
        self.response = response.into();
    }
}

#[cfg(test)]
mod tests {
    use super::{QueryKeyAction, QuerySurface, query_key_action};
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    #[test]
    fn bare_enter_submits() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(query_key_action(&key), QueryKeyAction::Submit);
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT);
        assert_eq!(query_key_action(&key), QueryKeyAction::InsertNewline);
    }

    #[test]
    fn release_events_pass_through() {
        let key = KeyEvent::new_with_kind(
            KeyCode::Enter,
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );
        assert_eq!(query_key_action(&key), QueryKeyAction::Pass);
    }

    #[test]
    fn other_keys_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(query_key_action(&key), QueryKeyAction::Pass);
    }

    #[test]
    fn closing_clears_draft_and_response() {
        let mut surface = QuerySurface::new();
        surface.open();
        surface.set_draft("what does this do?");
        surface.push_newline();
        surface.push_char('x');
        surface.set_response("an answer");

        surface.close();
        assert!(!surface.is_open());
        assert_eq!(surface.draft(), "");
        assert_eq!(surface.response(), "");
    }
}
