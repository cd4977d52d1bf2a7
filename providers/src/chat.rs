//! OpenAI-compatible chat completions client.
//!
//! Speaks the non-streaming `POST {base_url}/chat/completions` dialect shared
//! by Groq and other OpenAI-compatible gateways: a single user-role message
//! in, the first choice's message content out. One HTTP request per call, no
//! internal retries.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{CompletionTransport, TransportError, read_capped_error_body};
use sage_types::{CredentialKey, ModelId};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// HTTP client for one OpenAI-compatible completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl ChatClient {
    /// Client against `base_url`, using the shared hardened HTTP client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(crate::http_client().clone(), base_url)
    }

    /// Client with a caller-supplied `reqwest::Client`. Used by tests and by
    /// hosts that need their own TLS or proxy setup.
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a ModelId,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionTransport for ChatClient {
    async fn complete(
        &self,
        credential: &CredentialKey,
        model: &ModelId,
        prompt: &str,
    ) -> Result<String, TransportError> {
        // Unset slots are not filtered out of the rotation pool; they fail
        // here, on their turn, without a network round trip.
        if credential.is_unset() {
            return Err(TransportError::MissingCredential);
        }

        let request = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.completions_url())
            .timeout(self.request_timeout)
            .bearer_auth(credential.expose_secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_capped_error_body(response).await;
            tracing::warn!(%status, model = %model, "completion request rejected");
            return Err(TransportError::Api { status, body });
        }

        let bytes = response.bytes().await?;
        let completion: ChatCompletion = serde_json::from_slice(&bytes)?;

        // A completion with no choices or null content is an empty reply,
        // not an error.
        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::ChatClient;
    use crate::{CompletionTransport, TransportError};
    use sage_types::{CredentialKey, ModelId};
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ChatClient {
        ChatClient::with_client(reqwest::Client::new(), server.uri())
    }

    #[tokio::test]
    async fn success_returns_first_choice_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "m-1",
                "messages": [{"role": "user", "content": "explain this"}],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "It adds."}}],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .complete(
                &CredentialKey::new("test-key"),
                &ModelId::new("m-1"),
                "explain this",
            )
            .await;

        assert_eq!(result.unwrap(), "It adds.");
    }

    #[tokio::test]
    async fn missing_content_maps_to_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server)
            .complete(&CredentialKey::new("k"), &ModelId::new("m"), "p")
            .await;

        assert_eq!(result.unwrap(), "");
    }

    #[tokio::test]
    async fn api_error_status_is_preserved() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .complete(&CredentialKey::new("k"), &ModelId::new("m"), "p")
            .await;

        match result {
            Err(TransportError::Api { status, body }) => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_payload_is_a_payload_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .complete(&CredentialKey::new("k"), &ModelId::new("m"), "p")
            .await;

        assert!(matches!(result, Err(TransportError::Payload(_))));
    }

    #[tokio::test]
    async fn unset_credential_fails_without_a_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .complete(&CredentialKey::new(""), &ModelId::new("m"), "p")
            .await;

        assert!(matches!(result, Err(TransportError::MissingCredential)));
    }
}
