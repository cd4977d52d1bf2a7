//! Transient toast notices for the notification channel.
//!
//! Notices are fire-and-forget: producers push them, the host UI drains and
//! renders them, and nothing is reported back. They carry everything the
//! host needs to place and expire a toast.

use std::time::Duration;

/// Default time a notice stays on screen before auto-closing.
pub const DEFAULT_NOTICE_AUTO_CLOSE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Corner of the ambient surface a notice is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticePosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

/// A single transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    kind: NoticeKind,
    message: String,
    position: NoticePosition,
    auto_close: Duration,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            position: NoticePosition::default(),
            auto_close: DEFAULT_NOTICE_AUTO_CLOSE,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            position: NoticePosition::default(),
            auto_close: DEFAULT_NOTICE_AUTO_CLOSE,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: NoticePosition) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_auto_close(mut self, auto_close: Duration) -> Self {
        self.auto_close = auto_close;
        self
    }

    #[must_use]
    pub const fn kind(&self) -> NoticeKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub const fn position(&self) -> NoticePosition {
        self.position
    }

    #[must_use]
    pub const fn auto_close(&self) -> Duration {
        self.auto_close
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_NOTICE_AUTO_CLOSE, Notice, NoticeKind, NoticePosition};
    use std::time::Duration;

    #[test]
    fn success_defaults_to_bottom_right() {
        let notice = Notice::success("Copied successfully!");
        assert_eq!(notice.kind(), NoticeKind::Success);
        assert_eq!(notice.position(), NoticePosition::BottomRight);
        assert_eq!(notice.auto_close(), DEFAULT_NOTICE_AUTO_CLOSE);
        assert_eq!(notice.message(), "Copied successfully!");
    }

    #[test]
    fn builder_overrides_apply() {
        let notice = Notice::error("boom")
            .with_position(NoticePosition::TopLeft)
            .with_auto_close(Duration::from_secs(10));
        assert_eq!(notice.kind(), NoticeKind::Error);
        assert_eq!(notice.position(), NoticePosition::TopLeft);
        assert_eq!(notice.auto_close(), Duration::from_secs(10));
    }
}
