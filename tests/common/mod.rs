#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use noodle_kiosk_client::config::Config;

/// In-process stand-in for the kiosk backend. Counts every call.
#[derive(Default)]
pub struct MockBackend {
    pub chat_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub dispense_calls: AtomicUsize,
    pub stop_calls: AtomicUsize,
    pub chat_bodies: Mutex<Vec<Value>>,
    pub chat_replies: Mutex<VecDeque<Value>>,
    pub chat_error: Mutex<Option<StatusCode>>,
    pub chat_delay: Mutex<Duration>,
    /// `None` makes `/status` answer 503.
    pub status: Mutex<Option<Value>>,
    pub dispensed: Mutex<Vec<u32>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_chat_reply(&self, reply: Value) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn fail_chat_with(&self, code: StatusCode) {
        *self.chat_error.lock().unwrap() = Some(code);
    }

    pub fn delay_chat(&self, delay: Duration) {
        *self.chat_delay.lock().unwrap() = delay;
    }

    pub fn set_status(&self, status: Option<Value>) {
        *self.status.lock().unwrap() = status;
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn dispense_calls(&self) -> usize {
        self.dispense_calls.load(Ordering::SeqCst)
    }

    pub fn chat_body(&self, index: usize) -> Value {
        self.chat_bodies.lock().unwrap()[index].clone()
    }
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Noodle Vending Machine API",
        "status": "running",
        "mqtt_connected": true,
        "device_status": "ready",
        "ai_enabled": false
    }))
}

async fn chat(State(mock): State<Arc<MockBackend>>, Json(body): Json<Value>) -> Response {
    mock.chat_calls.fetch_add(1, Ordering::SeqCst);
    mock.chat_bodies.lock().unwrap().push(body);

    let delay = *mock.chat_delay.lock().unwrap();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let error = *mock.chat_error.lock().unwrap();
    if let Some(code) = error {
        return (code, Json(json!({"detail": "backend failure"}))).into_response();
    }

    let reply = mock
        .chat_replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| json!({"reply": "ok"}));
    Json(reply).into_response()
}

async fn status(State(mock): State<Arc<MockBackend>>) -> Response {
    mock.status_calls.fetch_add(1, Ordering::SeqCst);
    let status = mock.status.lock().unwrap().clone();
    match status {
        Some(body) => Json(body).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

async fn manual_dispense(State(mock): State<Arc<MockBackend>>, Path(slot): Path<u32>) -> Json<Value> {
    mock.dispense_calls.fetch_add(1, Ordering::SeqCst);
    mock.dispensed.lock().unwrap().push(slot);
    Json(json!({
        "success": true,
        "message": format!("Command sent: noodle_{}", slot),
        "noodle_name": "Chicken Noodles"
    }))
}

async fn emergency_stop(State(mock): State<Arc<MockBackend>>) -> Json<Value> {
    mock.stop_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({"success": true, "message": "Emergency stop command sent"}))
}

async fn logs() -> Json<Value> {
    Json(json!({"logs": ["[12:00:01] [ORDER] User ordered: Chicken Noodles"], "count": 1}))
}

/// Serve the mock on an ephemeral port and return its base URL.
pub async fn spawn(mock: Arc<MockBackend>) -> String {
    let app = Router::new()
        .route("/", get(root))
        .route("/chat", post(chat))
        .route("/status", get(status))
        .route("/manual_dispense/{slot}", post(manual_dispense))
        .route("/emergency_stop", post(emergency_stop))
        .route("/logs", get(logs))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn config_for(url: &str) -> Config {
    Config {
        backend_url: url.to_string(),
        request_timeout: Duration::from_millis(500),
        ..Config::default()
    }
}
