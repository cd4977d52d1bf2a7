//! Dispatch orchestration for Sage.
//!
//! This crate contains the engineering core of the code-explanation
//! feature, independent of any rendering:
//!
//! - [`RotationRing`] - paired credential/model selection state, advanced
//!   once per completed attempt (round-robin credential, random model).
//! - [`Dispatcher`] - one in-flight completion per channel, guaranteed
//!   advance-and-release on every exit path, transport failures contained
//!   as fixed fallback text.
//! - [`SageConfig`] - TOML + environment configuration feeding both.
//!
//! The transport and the UI state sink are injected: the dispatcher is
//! constructed once per application lifetime and shared by `Arc` with the
//! host UI.

mod config;
mod dispatch;
mod prompt;
mod rotation;

pub use config::{ApiConfig, ConfigError, PoolsConfig, SageConfig};
pub use dispatch::{Dispatcher, EXPLAIN_FALLBACK, QUERY_FALLBACK, StateSink};
pub use prompt::{explain_prompt, query_prompt};
pub use rotation::{PoolError, RotationRing};

// Re-export the crates callers need to name at the seams.
pub use sage_providers::{self, ChatClient, CompletionTransport, TransportError};
pub use sage_types::{ChannelKind, ChannelReply, CredentialKey, ModelId};
