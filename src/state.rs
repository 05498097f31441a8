// src/state.rs
use std::sync::Arc;
use std::time::Duration;

use crate::services::device_monitor::DeviceMonitor;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

/// Client-side state: the conversation (written by message exchange) and the
/// device view (written by status polling).
pub struct AppState {
    pub session: SessionManager,
    pub device: DeviceMonitor,
}

impl AppState {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            session: SessionManager::new(),
            device: DeviceMonitor::new(stale_after),
        }
    }
}
