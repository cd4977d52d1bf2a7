//! Clipboard copy for the live editor contents.
//!
//! A side channel: shares nothing with the dispatcher - no busy flag, no
//! rotation state. The outcome is reported as a toast notice, never as a
//! blocking dialog.

use sage_types::Notice;

use crate::notice::NoticeQueue;

/// Toast shown when the copy lands on the clipboard.
pub const COPY_SUCCESS_MESSAGE: &str = "Copied successfully!";

/// Toast shown when the clipboard rejects the write.
pub const COPY_FAILURE_MESSAGE: &str = "Could not copy to the clipboard.";

#[derive(Debug, thiserror::Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(String);

impl From<arboard::Error> for ClipboardError {
    fn from(error: arboard::Error) -> Self {
        Self(error.to_string())
    }
}

/// Where copied text lands. The system clipboard is the real backend; tests
/// substitute their own.
pub trait ClipboardBackend {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// `arboard`-backed system clipboard. The handle is opened per call; some
/// platforms invalidate long-lived clipboard handles.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl ClipboardBackend for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text.to_string())?;
        Ok(())
    }
}

/// Copy the live editor contents and report the outcome to the notice
/// queue. Empty content is a no-op with no notice. Returns whether the text
/// reached the clipboard.
pub fn copy_editor_contents(
    backend: &mut impl ClipboardBackend,
    contents: &str,
    notices: &mut NoticeQueue,
) -> bool {
    if contents.is_empty() {
        tracing::debug!("copy skipped; editor is empty");
        return false;
    }
    match backend.set_text(contents) {
        Ok(()) => {
            notices.push(Notice::success(COPY_SUCCESS_MESSAGE));
            true
        }
        Err(error) => {
            tracing::error!(%error, "failed to copy editor contents");
            notices.push(Notice::error(COPY_FAILURE_MESSAGE));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        COPY_FAILURE_MESSAGE, COPY_SUCCESS_MESSAGE, ClipboardBackend, ClipboardError,
        copy_editor_contents,
    };
    use crate::notice::NoticeQueue;
    use sage_types::NoticeKind;

    #[derive(Default)]
    struct FakeClipboard {
        writes: Vec<String>,
        fail: bool,
    }

    impl ClipboardBackend for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError("denied".to_string()));
            }
            self.writes.push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn repeat_copies_emit_independent_success_notices() {
        let mut clipboard = FakeClipboard::default();
        let mut notices = NoticeQueue::new();

        assert!(copy_editor_contents(&mut clipboard, "fn main() {}", &mut notices));
        assert!(copy_editor_contents(&mut clipboard, "fn main() {}", &mut notices));

        assert_eq!(clipboard.writes.len(), 2);
        let notices = notices.take();
        assert_eq!(notices.len(), 2);
        for notice in &notices {
            assert_eq!(notice.kind(), NoticeKind::Success);
            assert_eq!(notice.message(), COPY_SUCCESS_MESSAGE);
        }
    }

    #[test]
    fn failure_emits_an_error_notice() {
        let mut clipboard = FakeClipboard {
            fail: true,
            ..FakeClipboard::default()
        };
        let mut notices = NoticeQueue::new();

        assert!(!copy_editor_contents(&mut clipboard, "text", &mut notices));

        let notices = notices.take();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind(), NoticeKind::Error);
        assert_eq!(notices[0].message(), COPY_FAILURE_MESSAGE);
    }

    #[test]
    fn empty_contents_are_a_silent_no_op() {
        let mut clipboard = FakeClipboard::default();
        let mut notices = NoticeQueue::new();

        assert!(!copy_editor_contents(&mut clipboard, "", &mut notices));

        assert!(clipboard.writes.is_empty());
        assert!(notices.is_empty());
    }
}
