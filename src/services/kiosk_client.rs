// src/services/kiosk_client.rs
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::ClientError;
use crate::message::{BackendInfo, ChatRequest, ChatResponse, CommandResponse, LogsResponse, StatusResponse};
use crate::services::device_monitor::DeviceState;
use crate::services::session_manager::{MessageRole, OrderUpdate};
use crate::state::{AppState, SharedState};

#[derive(Clone, Debug, PartialEq)]
pub enum ChatOutcome {
    /// Empty input; nothing was sent.
    Ignored,
    Replied(ChatReply),
    Failed { cause: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatReply {
    pub reply: Option<String>,
    pub action: Option<String>,
    pub warning: Option<String>,
    pub error: Option<String>,
    pub info: Option<String>,
    pub confirmed: bool,
    /// Pending order after the reply was merged.
    pub pending_order: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub message: String,
}

impl CommandOutcome {
    fn failed(err: ClientError) -> Self {
        Self { success: false, message: err.to_string() }
    }
}

impl From<CommandResponse> for CommandOutcome {
    fn from(resp: CommandResponse) -> Self {
        let message = resp.message.unwrap_or_else(|| {
            if resp.success { "Command sent".to_string() } else { "Command failed".to_string() }
        });
        Self { success: resp.success, message }
    }
}

/// HTTP client for the kiosk backend. Cloning shares the connection pool,
/// the session and the device view.
#[derive(Clone)]
pub struct KioskClient {
    http: Client,
    base_url: Arc<str>,
    slot_count: u32,
    state: SharedState,
    sending: Arc<AtomicBool>,
}

impl KioskClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self {
            http,
            base_url: Arc::from(config.backend_url.trim_end_matches('/')),
            slot_count: config.slot_count(),
            state: Arc::new(AppState::new(config.stale_after)),
            sending: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn session_id(&self) -> &str {
        self.state.session.id()
    }

    /// Send one user utterance and merge the reply into local state.
    /// Failures leave the pending order and device view untouched.
    pub async fn send_user_message(&self, text: &str) -> ChatOutcome {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return ChatOutcome::Ignored;
        }

        let Some(_guard) = SendGuard::acquire(&self.sending) else {
            return ChatOutcome::Failed { cause: ClientError::InFlight.to_string() };
        };

        let session = &self.state.session;
        session.append_turn(MessageRole::User, trimmed).await;

        match self.exchange(trimmed).await {
            Ok(reply) => {
                if let Some(text) = &reply.reply {
                    session.append_turn(MessageRole::Ai, text.as_str()).await;
                }
                ChatOutcome::Replied(reply)
            }
            Err(err) => {
                warn!(session_id = %session.id(), error = %err, "chat request failed");
                let cause = err.to_string();
                session.append_turn(MessageRole::Ai, cause.as_str()).await;
                ChatOutcome::Failed { cause }
            }
        }
    }

    async fn exchange(&self, text: &str) -> Result<ChatReply, ClientError> {
        let session = &self.state.session;
        let pending = session.pending_order().await;
        let body = ChatRequest {
            user_message: text,
            session_id: session.id(),
            pending_order: pending.as_ref(),
        };

        let url = self.url("/chat");
        debug!(%url, "POST");
        let resp = self.http.post(&url).json(&body).send().await?;
        let resp: ChatResponse = read_json(resp).await?;

        let confirmed = resp.confirmed.unwrap_or(false);
        let pending_order = session
            .apply_order_update(OrderUpdate { pending_order: resp.pending_order, confirmed })
            .await;
        self.state
            .device
            .merge_reported(resp.device_status.as_deref(), resp.mqtt_connected)
            .await;

        Ok(ChatReply {
            reply: resp.reply,
            action: resp.action,
            warning: resp.warning,
            error: resp.error,
            info: resp.info,
            confirmed,
            pending_order,
        })
    }

    /// Poll `/status` once and return the resulting device view.
    pub async fn refresh_status(&self) -> DeviceState {
        let device = &self.state.device;
        match self.get_json::<StatusResponse>("/status").await {
            Ok(status) => {
                device
                    .record_poll(status.device_status, status.mqtt_connected, Instant::now())
                    .await;
            }
            Err(err) => {
                warn!(error = %err, "status poll failed");
                device.record_poll_failure().await;
            }
        }
        device.snapshot().await
    }

    /// Trigger one dispenser slot directly. Rejected locally unless the
    /// device currently reads as ready.
    pub async fn manual_dispense(&self, slot: u32) -> CommandOutcome {
        match self.dispense(slot).await {
            Ok(resp) => resp.into(),
            Err(err) => {
                warn!(slot, error = %err, "manual dispense not performed");
                CommandOutcome::failed(err)
            }
        }
    }

    async fn dispense(&self, slot: u32) -> Result<CommandResponse, ClientError> {
        if slot == 0 || slot > self.slot_count {
            return Err(ClientError::InvalidSlot { slot, max: self.slot_count });
        }
        let status = self.state.device.effective_status(Instant::now()).await;
        if !status.is_ready() {
            return Err(ClientError::NotReady { status: status.to_string() });
        }
        self.post_json(&format!("/manual_dispense/{}", slot)).await
    }

    pub async fn emergency_stop(&self) -> CommandOutcome {
        match self.post_json::<CommandResponse>("/emergency_stop").await {
            Ok(resp) => resp.into(),
            Err(err) => {
                warn!(error = %err, "emergency stop failed");
                CommandOutcome::failed(err)
            }
        }
    }

    pub async fn recent_logs(&self) -> Result<Vec<String>, ClientError> {
        let resp: LogsResponse = self.get_json("/logs").await?;
        Ok(resp.logs)
    }

    /// Liveness probe against `GET /`.
    pub async fn probe(&self) -> Result<BackendInfo, ClientError> {
        self.get_json("/").await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        read_json(resp).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = self.http.post(&url).send().await?;
        read_json(resp).await
    }
}

async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status(status));
    }
    Ok(resp.json::<T>().await?)
}

/// Holds the single in-flight slot for chat sends until dropped.
struct SendGuard<'a>(&'a AtomicBool);

impl<'a> SendGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SendGuard(flag))
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
