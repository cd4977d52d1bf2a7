//! Core domain types for Sage.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies: credential and model identifiers for the rotation pools,
//! the dispatch channel vocabulary, and toast notice payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

mod notice;

pub use notice::{DEFAULT_NOTICE_AUTO_CLOSE, Notice, NoticeKind, NoticePosition};

// ============================================================================
// Credential Key
// ============================================================================

/// Opaque API credential token for the completion transport.
///
/// Pool slots may legitimately hold an unset (empty) token: unconfigured
/// slots are not filtered out, they fail on their turn and rotation moves
/// past them.
///
/// Note: `Debug` is manually implemented to redact the token value,
/// preventing accidental credential disclosure in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialKey(String);

impl CredentialKey {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the authorization header. Do not log.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// True when the slot holds no configured token.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unset() {
            write!(f, "CredentialKey(<unset>)")
        } else {
            write!(f, "CredentialKey(<redacted>)")
        }
    }
}

impl From<&str> for CredentialKey {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for CredentialKey {
    fn from(token: String) -> Self {
        Self(token)
    }
}

// ============================================================================
// Model Id
// ============================================================================

/// Opaque model identifier as the completion API expects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModelId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Dispatch Channels
// ============================================================================

/// Independent request/response lanes of the dispatcher.
///
/// Each channel has its own busy flag and last reply; the two lanes share
/// only the rotation ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelKind {
    /// "Explain this code" requests.
    Explain,
    /// Free-form question about the code.
    Query,
}

impl ChannelKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChannelKind::Explain => "explain",
            ChannelKind::Query => "query",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of the most recent dispatch attempt on a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ChannelReply {
    /// No attempt completed yet, or the previous reply was cleared.
    #[default]
    Empty,
    /// Completion text returned by the transport.
    Text(String),
    /// The attempt failed; `fallback` is the fixed user-visible message
    /// shown in place of the raw transport error.
    Failed { fallback: &'static str },
}

impl ChannelReply {
    /// The user-visible text for this reply, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            ChannelReply::Empty => None,
            ChannelReply::Text(text) => Some(text),
            ChannelReply::Failed { fallback } => Some(fallback),
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, ChannelReply::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::{ChannelKind, ChannelReply, CredentialKey, ModelId};

    #[test]
    fn credential_debug_is_redacted() {
        let key = CredentialKey::new("sk-very-secret");
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn unset_credential_debug_shows_unset() {
        let key = CredentialKey::new("");
        assert!(key.is_unset());
        assert_eq!(format!("{key:?}"), "CredentialKey(<unset>)");
    }

    #[test]
    fn model_id_display_matches_input() {
        let model = ModelId::new("llama-3.3-70b");
        assert_eq!(model.to_string(), "llama-3.3-70b");
        assert_eq!(model.as_str(), "llama-3.3-70b");
    }

    #[test]
    fn channel_kind_display() {
        assert_eq!(ChannelKind::Explain.to_string(), "explain");
        assert_eq!(ChannelKind::Query.to_string(), "query");
    }

    #[test]
    fn reply_message_accessor() {
        assert_eq!(ChannelReply::Empty.message(), None);
        assert_eq!(ChannelReply::Text("hello".into()).message(), Some("hello"));
        let failed = ChannelReply::Failed { fallback: "oops" };
        assert_eq!(failed.message(), Some("oops"));
        assert!(failed.is_failure());
    }
}
