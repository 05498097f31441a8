// src/services/device_monitor.rs
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use super::device_status::DeviceStatus;

pub const DISCONNECTED: &str = "disconnected";

/// Last-known state of the dispenser as reported by the backend.
#[derive(Clone, Debug)]
pub struct DeviceState {
    pub device_status: String,
    pub mqtt_connected: bool,
    /// Time of the last successful status poll.
    pub last_update_at: Option<Instant>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            device_status: DISCONNECTED.to_string(),
            mqtt_connected: false,
            last_update_at: None,
        }
    }
}

impl DeviceState {
    /// A state that was never refreshed counts as stale.
    pub fn is_stale(&self, now: Instant, stale_after: Duration) -> bool {
        match self.last_update_at {
            Some(at) => now.saturating_duration_since(at) > stale_after,
            None => true,
        }
    }

    /// Status to act on and display: stale data reads as disconnected.
    pub fn effective_status(&self, now: Instant, stale_after: Duration) -> DeviceStatus {
        if self.is_stale(now, stale_after) {
            DeviceStatus::Disconnected
        } else {
            DeviceStatus::parse(&self.device_status)
        }
    }

    pub fn status_line(&self, now: Instant, stale_after: Duration) -> StatusLine {
        let stale = self.is_stale(now, stale_after);
        StatusLine {
            status: self.effective_status(now, stale_after),
            mqtt_connected: self.mqtt_connected && !stale,
            stale,
        }
    }
}

/// What the presentation layer shows; derived from cached state only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusLine {
    pub status: DeviceStatus,
    pub mqtt_connected: bool,
    pub stale: bool,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            status: DeviceStatus::Disconnected,
            mqtt_connected: false,
            stale: true,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device: {} | MQTT: {}",
            self.status,
            if self.mqtt_connected { "connected" } else { "disconnected" }
        )
    }
}

#[derive(Clone, Debug)]
pub struct DeviceMonitor {
    inner: Arc<RwLock<DeviceState>>,
    stale_after: Duration,
}

impl DeviceMonitor {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(DeviceState::default())),
            stale_after,
        }
    }

    pub async fn snapshot(&self) -> DeviceState {
        self.inner.read().await.clone()
    }

    /// Successful poll: missing fields fall back to disconnected/false.
    pub async fn record_poll(&self, device_status: Option<String>, mqtt_connected: Option<bool>, at: Instant) {
        let mut state = self.inner.write().await;
        state.device_status = device_status.unwrap_or_else(|| DISCONNECTED.to_string());
        state.mqtt_connected = mqtt_connected.unwrap_or(false);
        state.last_update_at = Some(at);
    }

    /// Failed poll. `last_update_at` keeps the last successful time.
    pub async fn record_poll_failure(&self) {
        let mut state = self.inner.write().await;
        state.device_status = DISCONNECTED.to_string();
        state.mqtt_connected = false;
    }

    /// Fields piggy-backed on a chat reply. Only present fields are applied
    /// and the poll timestamp is left alone.
    pub async fn merge_reported(&self, device_status: Option<&str>, mqtt_connected: Option<bool>) {
        if device_status.is_none() && mqtt_connected.is_none() {
            return;
        }
        let mut state = self.inner.write().await;
        if let Some(status) = device_status {
            state.device_status = status.to_string();
        }
        if let Some(connected) = mqtt_connected {
            state.mqtt_connected = connected;
        }
    }

    pub async fn effective_status(&self, now: Instant) -> DeviceStatus {
        self.inner.read().await.effective_status(now, self.stale_after)
    }

    pub async fn status_line(&self, now: Instant) -> StatusLine {
        self.inner.read().await.status_line(now, self.stale_after)
    }
}
