//! Shared fixtures for router tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use frame_protocol::{
    requests::{NotificationRequest, PointsAwardRequest, SignInRequest},
    FrameMessage, FrameRequest,
};
use frame_server::{
    config::Config,
    create_app, create_state,
    services::{
        notifier::Notifier,
        outbound::OutboundError,
        points::PointsAwarder,
        verifier::{MessageVerifier, VerifyError},
    },
    Services,
};
use serde_json::{json, Value};
use todo_store::MemoryTodoStore;
use tower::ServiceExt;

/// Message bytes the fake verifier accepts.
pub const SIGNED: &str = "0a2b3c";

/// Signature the fake verifier accepts for sign-in.
pub const VALID_SIGNATURE: &str = "0xsigned";

/// Verifier that trusts the untrusted copy when the message bytes are [`SIGNED`].
pub struct FakeVerifier;

#[async_trait]
impl MessageVerifier for FakeVerifier {
    async fn verify_frame_action(
        &self,
        request: &FrameRequest,
    ) -> Result<FrameMessage, VerifyError> {
        if request.trusted_data.message_bytes != SIGNED {
            return Err(VerifyError::InvalidSignature);
        }
        let data = &request.untrusted_data;
        Ok(FrameMessage {
            fid: data.fid.ok_or(VerifyError::InvalidSignature)?,
            button_index: data.button_index,
            input_text: data.input_text.clone(),
            state: data.state.clone(),
        })
    }

    async fn verify_sign_in(&self, request: &SignInRequest) -> Result<u64, VerifyError> {
        if request.signature != VALID_SIGNATURE {
            return Err(VerifyError::InvalidSignature);
        }
        request
            .message
            .parse()
            .map_err(|_| VerifyError::InvalidSignature)
    }
}

/// Points awarder that records every call.
#[derive(Default)]
pub struct RecordingPoints {
    pub calls: Mutex<Vec<PointsAwardRequest>>,
    pub fail: bool,
}

#[async_trait]
impl PointsAwarder for RecordingPoints {
    async fn award(&self, request: &PointsAwardRequest) -> Result<(), OutboundError> {
        self.calls.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(OutboundError::Status(503));
        }
        Ok(())
    }
}

/// Notifier that records every call.
#[derive(Default)]
pub struct RecordingNotifier {
    pub calls: Mutex<Vec<NotificationRequest>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, request: &NotificationRequest) -> Result<(), OutboundError> {
        self.calls.lock().unwrap().push(request.clone());
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: MemoryTodoStore,
    pub points: Arc<RecordingPoints>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_points(RecordingPoints::default())
    }

    pub fn with_failing_points() -> Self {
        Self::with_points(RecordingPoints {
            fail: true,
            ..Default::default()
        })
    }

    fn with_points(points: RecordingPoints) -> Self {
        let config = Config {
            public_url: "https://todo.example".to_string(),
            jwt_secret: Some("test-secret".to_string()),
            ..Config::default()
        };
        let store = MemoryTodoStore::new();
        let points = Arc::new(points);
        let notifier = Arc::new(RecordingNotifier::default());

        let services = Services {
            verifier: Arc::new(FakeVerifier),
            points: Some(points.clone()),
            notifier: Some(notifier.clone()),
        };
        let state = create_state(config, store.clone(), services).unwrap();

        Self {
            router: create_app(state),
            store,
            points,
            notifier,
        }
    }

    pub fn points_calls(&self) -> Vec<PointsAwardRequest> {
        self.points.calls.lock().unwrap().clone()
    }

    pub fn notifier_calls(&self) -> Vec<NotificationRequest> {
        self.notifier.calls.lock().unwrap().clone()
    }

    /// Sends a request and returns the status and raw body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = self.send(request).await;
        (status, String::from_utf8(body).unwrap())
    }

    pub async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn post(&self, uri: &str, body: Value, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        let (status, body) = self.send(request).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    /// Presses `button` on the card whose echoed state is `state`.
    pub async fn press(
        &self,
        fid: u64,
        button: Option<u8>,
        input: Option<&str>,
        state: Option<&str>,
    ) -> (StatusCode, Value) {
        self.post("/api/frame", frame_request(fid, button, input, state), None)
            .await
    }

    /// Signs in `fid` and returns the session token.
    pub async fn sign_in(&self, fid: u64) -> String {
        let (_, body) = self.post("/api/auth/nonce", json!({}), None).await;
        let nonce = body["nonce"].as_str().unwrap().to_string();

        let (status, body) = self
            .post(
                "/api/auth/sign-in",
                json!({ "message": fid.to_string(), "signature": VALID_SIGNATURE, "nonce": nonce }),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn frame_request(
    fid: u64,
    button: Option<u8>,
    input: Option<&str>,
    state: Option<&str>,
) -> Value {
    json!({
        "untrustedData": {
            "fid": fid,
            "buttonIndex": button,
            "inputText": input,
            "state": state,
            "url": "https://todo.example",
            "timestamp": 1_700_000_000_000i64,
        },
        "trustedData": { "messageBytes": SIGNED }
    })
}

/// Returns the single card of a frame response.
pub fn card(body: &Value) -> &Value {
    &body["frames"][0]
}

pub fn labels(body: &Value) -> Vec<String> {
    card(body)["buttons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["label"].as_str().unwrap().to_string())
        .collect()
}

/// Returns the echoed state carried by the card.
pub fn echoed_state(body: &Value) -> String {
    card(body)["state"].as_str().unwrap().to_string()
}
