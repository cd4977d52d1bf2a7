//! Completion transport for Sage.
//!
//! # Architecture
//!
//! The crate is organized around one seam:
//!
//! - [`CompletionTransport`] - the opaque effectful operation the dispatcher
//!   drives: one credential, one model, one prompt in; completion text out.
//! - [`chat`] - the HTTP implementation against OpenAI-compatible
//!   `chat/completions` endpoints (Groq and compatible gateways).
//!
//! # Error Handling
//!
//! Every failure mode of a completion call is folded into [`TransportError`].
//! Callers upstream (the dispatcher) treat the transport as opaque: any `Err`
//! is logged and converted to fixed fallback text, so nothing in this crate
//! needs to produce user-facing messages.

use std::future::Future;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use sage_types::{CredentialKey, ModelId};

pub mod chat;

pub use chat::ChatClient;

/// Canonical OpenAI-compatible base URL of the Groq completion API.
pub const GROQ_OPENAI_BASE_URL: &str = "https://api.groq.com/openai/v1";

const CONNECT_TIMEOUT_SECS: u64 = 30;

const TCP_KEEPALIVE_SECS: u64 = 60;

// Connection pool settings (from httpx defaults)
const POOL_MAX_IDLE_PER_HOST: usize = 100;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

/// One completion call against an external API.
///
/// Implementations must not retry internally: the dispatcher's policy is
/// retry-by-rotation, where the next user-triggered attempt runs against the
/// next credential/model pair.
pub trait CompletionTransport: Send + Sync {
    /// Send `prompt` as a single user-role message and return the completion
    /// text. Any thrown or rejected outcome must surface as
    /// [`TransportError`]; nothing here reaches the UI uncaught.
    fn complete(
        &self,
        credential: &CredentialKey,
        model: &ModelId,
        prompt: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

impl<T: CompletionTransport> CompletionTransport for Arc<T> {
    fn complete(
        &self,
        credential: &CredentialKey,
        model: &ModelId,
        prompt: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send {
        (**self).complete(credential, model, prompt)
    }
}

/// Failure of a single completion call.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The rotation slot for this attempt holds no configured credential.
    /// Rotation advances past the slot on the next attempt.
    #[error("credential slot is empty")]
    MissingCredential,

    /// Connection-level or protocol-level HTTP failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("api error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The response body did not match the completion schema.
    #[error("malformed completion payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        base_client_builder().build().unwrap_or_else(|e| {
            tracing::error!(
                "Failed to build hardened HTTP client: {e}. Attempting minimal hardened fallback."
            );
            reqwest::Client::builder()
                .https_only(true)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("Minimal hardened HTTP client must build; cannot proceed without TLS")
        })
    })
}

fn base_client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .redirect(reqwest::redirect::Policy::none())
        .https_only(true)
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Read an error response body, truncated at `MAX_ERROR_BODY_BYTES` so a
/// misbehaving endpoint cannot balloon memory or logs.
pub async fn read_capped_error_body(response: reqwest::Response) -> String {
    use futures_util::StreamExt;
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let Ok(chunk) = chunk else { break };
        body.extend_from_slice(&chunk);
        if body.len() > MAX_ERROR_BODY_BYTES {
            body.truncate(MAX_ERROR_BODY_BYTES);
            let text = String::from_utf8_lossy(&body);
            return format!("{text}...(truncated)");
        }
    }
    String::from_utf8_lossy(&body).into_owned()
}

#[cfg(test)]
mod tests {
    use super::TransportError;

    #[test]
    fn missing_credential_display_names_the_slot() {
        let error = TransportError::MissingCredential;
        assert_eq!(error.to_string(), "credential slot is empty");
    }

    #[test]
    fn api_error_display_carries_status() {
        let error = TransportError::Api {
            status: reqwest::StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("429"));
        assert!(rendered.contains("rate limited"));
    }
}
