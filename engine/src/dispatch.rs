//! Request dispatcher: at most one in-flight completion per channel.
//!
//! # Control flow
//!
//! A user action enters [`Dispatcher::submit_explain`] or
//! [`Dispatcher::submit_query`], which acquires the channel's busy flag,
//! reads the current credential/model pair from the rotation ring, issues
//! exactly one transport call, and writes the outcome into the injected
//! [`StateSink`]. A [`CompletionGuard`] advances the ring and releases the
//! flag on every exit path - the invariant the whole feature rests on: a
//! failed or dropped call must never pin the cursor to a bad credential or
//! wedge the channel.
//!
//! # Failure containment
//!
//! The dispatcher is the last line of defense between the transport and the
//! UI: every [`TransportError`] is logged and replaced with fixed fallback
//! text. No retry happens inside a submission; the next user-triggered
//! attempt runs against the next rotated pair.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context;

use crate::config::SageConfig;
use crate::prompt;
use crate::rotation::RotationRing;
use sage_providers::{ChatClient, CompletionTransport};
use sage_types::{ChannelKind, ChannelReply, CredentialKey, ModelId};

/// Fixed user-visible text when an explanation attempt fails. The raw
/// transport error is logged, never shown.
pub const EXPLAIN_FALLBACK: &str = "An error occurred while fetching the explanation.";

/// Fixed user-visible text when a free-form query attempt fails.
pub const QUERY_FALLBACK: &str = "An error occurred while fetching the response.";

/// Host-UI surface the dispatcher writes into.
///
/// Implementations should disable the triggering control while its channel
/// is busy; the dispatcher enforces the no-overlap invariant regardless.
pub trait StateSink: Send + Sync {
    fn set_busy(&self, channel: ChannelKind, busy: bool);
    /// Explanation text (or fallback) for the explanation surface.
    fn set_result(&self, text: &str);
    /// Open or close the explanation surface.
    fn set_surface_open(&self, open: bool);
    /// Response text (or fallback) for the free-form query surface.
    fn set_query_response(&self, text: &str);
}

#[derive(Debug, Default)]
struct ChannelState {
    busy: AtomicBool,
    last: Mutex<ChannelReply>,
}

impl ChannelState {
    fn try_acquire(&self) -> bool {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn store(&self, reply: ChannelReply) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = reply;
    }

    fn snapshot(&self) -> ChannelReply {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Runs the mandatory completion steps on every exit path of a dispatch:
/// advance the rotation ring, then release the channel.
struct CompletionGuard<'a> {
    ring: &'a Mutex<RotationRing>,
    channel: &'a ChannelState,
    sink: &'a dyn StateSink,
    kind: ChannelKind,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .advance();
        self.channel.busy.store(false, Ordering::Release);
        self.sink.set_busy(self.kind, false);
    }
}

/// Orchestrates completion requests for both channels over a shared
/// rotation ring.
///
/// One instance per application lifetime, shared by `Arc`. The channels are
/// independent: an outstanding explanation does not block a query. They
/// share only the ring, locked for the brief cursor read and the advance,
/// never across the transport await - so concurrent attempts each use the
/// pair that was current when they read it, even if the other channel
/// advances the ring mid-flight.
pub struct Dispatcher<T> {
    transport: T,
    ring: Mutex<RotationRing>,
    sink: Arc<dyn StateSink>,
    explain: ChannelState,
    query: ChannelState,
}

impl<T: CompletionTransport> Dispatcher<T> {
    pub fn new(transport: T, ring: RotationRing, sink: Arc<dyn StateSink>) -> Self {
        Self {
            transport,
            ring: Mutex::new(ring),
            sink,
            explain: ChannelState::default(),
            query: ChannelState::default(),
        }
    }

    /// "Explain this code". A submission while the explain channel is busy
    /// is dropped without any observable effect.
    pub async fn submit_explain(&self, source: &str) {
        if !self.explain.try_acquire() {
            tracing::debug!(channel = %ChannelKind::Explain, "submission ignored; channel busy");
            return;
        }
        self.sink.set_busy(ChannelKind::Explain, true);
        self.explain.store(ChannelReply::Empty);
        self.sink.set_result("");

        let (credential, model) = self.read_current();
        let _release = CompletionGuard {
            ring: &self.ring,
            channel: &self.explain,
            sink: self.sink.as_ref(),
            kind: ChannelKind::Explain,
        };

        let prompt = prompt::explain_prompt(source);
        match self.transport.complete(&credential, &model, &prompt).await {
            Ok(text) => {
                self.sink.set_result(&text);
                self.sink.set_surface_open(true);
                self.explain.store(ChannelReply::Text(text));
            }
            Err(error) => {
                tracing::error!(%error, model = %model, "explanation request failed");
                self.explain.store(ChannelReply::Failed {
                    fallback: EXPLAIN_FALLBACK,
                });
                self.sink.set_result(EXPLAIN_FALLBACK);
            }
        }
    }

    /// Free-form question about the code. A blank question is no-value
    /// input, not a failure: it short-circuits before the busy guard and
    /// never consumes a rotation slot.
    pub async fn submit_query(&self, source: &str, question: &str) {
        if question.trim().is_empty() {
            tracing::debug!(channel = %ChannelKind::Query, "empty question; nothing to dispatch");
            return;
        }
        if !self.query.try_acquire() {
            tracing::debug!(channel = %ChannelKind::Query, "submission ignored; channel busy");
            return;
        }
        self.sink.set_busy(ChannelKind::Query, true);
        self.query.store(ChannelReply::Empty);
        self.sink.set_query_response("");

        let (credential, model) = self.read_current();
        let _release = CompletionGuard {
            ring: &self.ring,
            channel: &self.query,
            sink: self.sink.as_ref(),
            kind: ChannelKind::Query,
        };

        let prompt = prompt::query_prompt(source, question);
        match self.transport.complete(&credential, &model, &prompt).await {
            Ok(text) => {
                self.sink.set_query_response(&text);
                self.query.store(ChannelReply::Text(text));
            }
            Err(error) => {
                tracing::error!(%error, model = %model, "query request failed");
                self.query.store(ChannelReply::Failed {
                    fallback: QUERY_FALLBACK,
                });
                self.sink.set_query_response(QUERY_FALLBACK);
            }
        }
    }

    #[must_use]
    pub fn is_busy(&self, channel: ChannelKind) -> bool {
        self.channel(channel).busy.load(Ordering::Acquire)
    }

    /// Outcome of the most recent completed attempt on `channel`.
    #[must_use]
    pub fn last_reply(&self, channel: ChannelKind) -> ChannelReply {
        self.channel(channel).snapshot()
    }

    fn channel(&self, kind: ChannelKind) -> &ChannelState {
        match kind {
            ChannelKind::Explain => &self.explain,
            ChannelKind::Query => &self.query,
        }
    }

    fn read_current(&self) -> (CredentialKey, ModelId) {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current()
    }
}

impl Dispatcher<ChatClient> {
    /// Assemble a ready dispatcher from configuration: typed pools into the
    /// ring, endpoint and timeout into the HTTP client.
    pub fn from_config(config: &SageConfig, sink: Arc<dyn StateSink>) -> anyhow::Result<Self> {
        let (credentials, models) = config.rotation_pools();
        let ring = RotationRing::new(credentials, models)
            .context("rotation pools are not usable; check [pools] in the config")?;
        let client =
            ChatClient::new(config.api_base_url()).with_request_timeout(config.request_timeout());
        Ok(Self::new(client, ring, sink))
    }
}
