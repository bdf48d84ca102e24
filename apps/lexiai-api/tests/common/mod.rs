//! Shared harness for the API integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use analysis_engine::{ChatModel, ChatRequest, LlmError};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use lexiai_api::{router, state, AppState, Config};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "correct horse battery";
const BOUNDARY: &str = "lexiai-test-boundary";

pub const ANALYSIS_REPLY: &str = r#"{
    "summary": "A twelve month apartment lease.",
    "riskLevel": "medium",
    "obligations": [{"text": "Tenant shall pay rent monthly", "simplified": "Pay rent every month", "importance": "high"}],
    "risks": [{"text": "forfeit the deposit", "simplified": "You can lose your deposit", "riskLevel": "high", "potential_impact": "$1,200"}],
    "deadlines": [{"text": "60 days notice", "simplified": "Give 60 days notice", "deadline_type": "notice", "urgency": "medium"}]
}"#;

pub const CLAUSES_REPLY: &str = r#"{"clauses": [
    {"originalText": "Rent is due on the first of each month.", "simplifiedText": "Pay on the 1st",
     "clauseType": "deadline", "riskLevel": "low", "explanation": "Late fees apply after the 5th"},
    {"originalText": "Tenant may not sublet.", "simplifiedText": "No subletting",
     "clauseType": "obligation", "explanation": "Ask the landlord first", "actionableAdvice": "Get consent in writing"}
]}"#;

pub const LEASE_TEXT: &str = "Rent is due on the first of each month. Tenant may not sublet.";

/// Replays queued replies in order; an empty queue behaves like a broken model
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn push(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(Ok(reply.to_string()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::InvalidResponse("no scripted reply".to_string())))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub model: Arc<ScriptedModel>,
    pub dir: TempDir,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    /// `name=value` of the session cookie set by this response
    pub fn session_cookie(&self) -> Option<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("lexiai.sid="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}/test.db?mode=rwc", dir.path().display());
        let pool = state::connect(&url, 5).await.unwrap();

        let mut config = Config::new(dir.path().join("uploads"));
        config.bcrypt_cost = 4;
        config.render_timeout_ms = 60_000;

        let model = Arc::new(ScriptedModel::default());
        let state = Arc::new(AppState::from_parts(pool, config, model.clone()).await.unwrap());

        Self {
            router: router(state.clone()),
            state,
            model,
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        Response { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> Response {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    /// Sign up a user and return their bearer token
    pub async fn signup(&self, email: &str) -> String {
        let response = self
            .post_json(
                "/api/auth/signup",
                None,
                json!({"email": email, "password": PASSWORD, "firstName": "Ada", "lastName": "Lovelace"}),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
        response.json()["token"].as_str().unwrap().to_string()
    }

    pub async fn upload(
        &self,
        token: &str,
        title: Option<&str>,
        file: Option<(&str, &str, &[u8])>,
    ) -> Response {
        let body = multipart_body(title, file);
        let request = Request::post("/api/documents/upload")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    /// Upload the sample lease with both analysis replies queued
    pub async fn upload_lease(&self, token: &str) -> String {
        self.model.push(ANALYSIS_REPLY);
        self.model.push(CLAUSES_REPLY);
        let response = self
            .upload(token, Some("Apartment Lease"), Some(("lease.txt", "text/plain", LEASE_TEXT.as_bytes())))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.json());
        response.json()["documentId"].as_str().unwrap().to_string()
    }

    pub fn stored_files(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("uploads")).unwrap().count()
    }
}

fn multipart_body(title: Option<&str>, file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(title) = title {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"title\"\r\n\r\n{title}\r\n").as_bytes(),
        );
    }
    if let Some((file_name, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"document\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
