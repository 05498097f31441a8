// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /chat`. `pending_order` is always sent, as `null` when no
/// order is awaiting confirmation.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub user_message: &'a str,
    pub session_id: &'a str,
    pub pending_order: Option<&'a Value>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub pending_order: Option<Value>,
    #[serde(default)]
    pub confirmed: Option<bool>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub warning: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub device_status: Option<String>,
    #[serde(default)]
    pub mqtt_connected: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub device_status: Option<String>,
    #[serde(default)]
    pub mqtt_connected: Option<bool>,
}

/// Shared answer shape of `/manual_dispense/{slot}` and `/emergency_stop`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Answer of the liveness probe `GET /`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct BackendInfo {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub mqtt_connected: Option<bool>,
    #[serde(default)]
    pub device_status: Option<String>,
    #[serde(default)]
    pub ai_enabled: Option<bool>,
}

impl BackendInfo {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}
