//! Signed message verification against a hub.
//!
//! Frame requests carry an untrusted copy of the interaction next to the
//! signed message bytes. Only the hub's decoding of the signed bytes is
//! trusted; the untrusted copy is never read.

use std::time::Duration;

use async_trait::async_trait;
use frame_protocol::{requests::SignInRequest, FrameMessage, FrameRequest};
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::ServerError;

/// Verification failure.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The message is not validly signed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The hub could not be reached or returned an unusable answer.
    #[error("Hub error: {0}")]
    Hub(String),
}

impl From<VerifyError> for ServerError {
    fn from(e: VerifyError) -> Self {
        match e {
            VerifyError::InvalidSignature => ServerError::InvalidSignature,
            VerifyError::Hub(msg) => ServerError::Verifier(msg),
        }
    }
}

/// Verifies signed messages and yields the authenticated actor.
#[async_trait]
pub trait MessageVerifier: Send + Sync {
    /// Verifies a frame action and returns its trusted contents.
    async fn verify_frame_action(&self, request: &FrameRequest)
        -> Result<FrameMessage, VerifyError>;

    /// Verifies a sign-in message and returns the signer's fid.
    async fn verify_sign_in(&self, request: &SignInRequest) -> Result<u64, VerifyError>;
}

// ============================================================================
// Hub wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct ValidateFrameBody<'a> {
    message_bytes_in_hex: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateFrameReply {
    valid: bool,
    #[serde(default)]
    action: Option<ValidatedAction>,
}

#[derive(Debug, Deserialize)]
struct ValidatedAction {
    interactor: Interactor,
    #[serde(default)]
    tapped_button: Option<TappedButton>,
    #[serde(default)]
    input: Option<ActionInput>,
    #[serde(default)]
    state: Option<ActionState>,
}

#[derive(Debug, Deserialize)]
struct Interactor {
    fid: u64,
}

#[derive(Debug, Deserialize)]
struct TappedButton {
    index: u8,
}

#[derive(Debug, Deserialize)]
struct ActionInput {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ActionState {
    serialized: String,
}

impl From<ValidatedAction> for FrameMessage {
    fn from(action: ValidatedAction) -> Self {
        Self {
            fid: action.interactor.fid,
            button_index: action.tapped_button.map(|b| b.index),
            input_text: action.input.map(|i| i.text),
            state: action.state.map(|s| s.serialized),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SignInReply {
    valid: bool,
    #[serde(default)]
    fid: Option<u64>,
}

// ============================================================================
// Hub client
// ============================================================================

/// Verifier backed by a hub's HTTP validation API.
#[derive(Debug, Clone)]
pub struct HubVerifier {
    hub_url: String,
    api_key: Option<String>,
    http_client: reqwest::Client,
}

impl HubVerifier {
    /// Creates a hub client whose requests give up after `timeout`.
    pub fn new(
        hub_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            hub_url: hub_url.trim_end_matches('/').to_string(),
            api_key,
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, VerifyError> {
        debug!(path = %path, "Calling hub");

        let mut request = self
            .http_client
            .post(format!("{}{}", self.hub_url, path))
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header("api_key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VerifyError::Hub(e.to_string()))?;

        let status = response.status();
        // Undecodable or forged messages come back as 400 or 422. Other client
        // errors (bad api key, rate limits) are the server's problem.
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(VerifyError::InvalidSignature);
        }
        if !status.is_success() {
            return Err(VerifyError::Hub(format!("Hub returned status {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| VerifyError::Hub(e.to_string()))
    }
}

#[async_trait]
impl MessageVerifier for HubVerifier {
    async fn verify_frame_action(
        &self,
        request: &FrameRequest,
    ) -> Result<FrameMessage, VerifyError> {
        let message_bytes = request.trusted_data.message_bytes.trim();
        if message_bytes.is_empty() {
            return Err(VerifyError::InvalidSignature);
        }

        let reply: ValidateFrameReply = self
            .post(
                "/v2/farcaster/frame/validate",
                &ValidateFrameBody {
                    message_bytes_in_hex: message_bytes,
                },
            )
            .await?;

        match reply {
            ValidateFrameReply {
                valid: true,
                action: Some(action),
            } => Ok(action.into()),
            _ => Err(VerifyError::InvalidSignature),
        }
    }

    async fn verify_sign_in(&self, request: &SignInRequest) -> Result<u64, VerifyError> {
        let reply: SignInReply = self.post("/v2/farcaster/siwf/verify", request).await?;

        match reply {
            SignInReply {
                valid: true,
                fid: Some(fid),
            } => Ok(fid),
            _ => Err(VerifyError::InvalidSignature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_action_to_message() {
        let reply: ValidateFrameReply = serde_json::from_str(
            r#"{
                "valid": true,
                "action": {
                    "interactor": { "fid": 42, "username": "alice" },
                    "tapped_button": { "index": 2 },
                    "input": { "text": "buy milk" },
                    "state": { "serialized": "{\"card\":\"entry\"}" }
                }
            }"#,
        )
        .unwrap();

        assert!(reply.valid);
        let message = FrameMessage::from(reply.action.unwrap());
        assert_eq!(message.fid, 42);
        assert_eq!(message.button_index, Some(2));
        assert_eq!(message.input_text.as_deref(), Some("buy milk"));
        assert_eq!(message.state.as_deref(), Some(r#"{"card":"entry"}"#));
    }

    #[test]
    fn test_validated_action_without_optional_parts() {
        let reply: ValidateFrameReply =
            serde_json::from_str(r#"{ "valid": true, "action": { "interactor": { "fid": 7 } } }"#)
                .unwrap();
        let message = FrameMessage::from(reply.action.unwrap());
        assert_eq!(message.button_index, None);
        assert_eq!(message.input_text, None);
        assert_eq!(message.state, None);
    }

    /// Serves a hub whose frame validation always answers `status`.
    async fn hub_answering(status: u16) -> String {
        use axum::{http::StatusCode as AxumStatus, routing::post, Router};

        let status = AxumStatus::from_u16(status).unwrap();
        let app = Router::new().route(
            "/v2/farcaster/frame/validate",
            post(move || async move { (status, "{}") }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn signed_request() -> FrameRequest {
        let mut request = FrameRequest::default();
        request.trusted_data.message_bytes = "0a0b0c".to_string();
        request
    }

    #[tokio::test]
    async fn test_rejected_message_is_invalid_signature() {
        for status in [400, 422] {
            let hub = hub_answering(status).await;
            let verifier = HubVerifier::new(&hub, None, Duration::from_secs(5)).unwrap();
            let result = verifier.verify_frame_action(&signed_request()).await;
            assert!(
                matches!(result, Err(VerifyError::InvalidSignature)),
                "status {}",
                status
            );
        }
    }

    #[tokio::test]
    async fn test_hub_access_errors_are_hub_failures() {
        for status in [401, 403, 429, 503] {
            let hub = hub_answering(status).await;
            let verifier =
                HubVerifier::new(&hub, Some("wrong-key".to_string()), Duration::from_secs(5))
                    .unwrap();
            let result = verifier.verify_frame_action(&signed_request()).await;
            assert!(matches!(result, Err(VerifyError::Hub(_))), "status {}", status);
        }
    }

    #[tokio::test]
    async fn test_empty_message_bytes_skip_the_hub() {
        // Port 9 is discard; the call must not be attempted at all.
        let verifier =
            HubVerifier::new("http://127.0.0.1:9", None, Duration::from_millis(50)).unwrap();
        let result = verifier.verify_frame_action(&FrameRequest::default()).await;
        assert!(matches!(result, Err(VerifyError::InvalidSignature)));
    }
}
