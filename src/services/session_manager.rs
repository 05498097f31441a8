// src/services/session_manager.rs
use std::{
    fmt::Debug,
    sync::Arc,
    time::Instant,
};

use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct ChatTurn {
    pub role: MessageRole,
    pub text: String,
    pub timestamp: Instant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Ai,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub pending_order: Option<Value>,
    pub turns: Vec<ChatTurn>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), pending_order: None, turns: Vec::new() }
    }
}

/// Order-related fields of one chat reply.
#[derive(Clone, Debug, Default)]
pub struct OrderUpdate {
    pub pending_order: Option<Value>,
    pub confirmed: bool,
}

/// The conversation of this client. The id is fixed at creation.
#[derive(Clone)]
pub struct SessionManager {
    id: Arc<str>,
    inner: Arc<RwLock<Session>>,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("id", &self.id)
            .finish()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    // Start a fresh session with a random id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().simple().to_string())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        let id: String = id.into();
        Self {
            id: Arc::from(id.as_str()),
            inner: Arc::new(RwLock::new(Session::new(id))),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn pending_order(&self) -> Option<Value> {
        self.inner.read().await.pending_order.clone()
    }

    /// Fold a reply into the pending order. A new order replaces the old one,
    /// then confirmation clears it, so confirmation wins when both arrive
    /// together. Returns the resulting pending order.
    pub async fn apply_order_update(&self, update: OrderUpdate) -> Option<Value> {
        let mut guard = self.inner.write().await;
        if let Some(order) = update.pending_order.filter(|o| !o.is_null()) {
            tracing::info!(session_id = %self.id, "pending order set");
            guard.pending_order = Some(order);
        }
        if update.confirmed && guard.pending_order.take().is_some() {
            tracing::info!(session_id = %self.id, "pending order confirmed");
        }
        guard.pending_order.clone()
    }

    // Append a turn to the transcript and return its length.
    pub async fn append_turn(&self, role: MessageRole, text: impl Into<String>) -> usize {
        let mut guard = self.inner.write().await;
        guard.turns.push(ChatTurn {
            role,
            text: text.into(),
            timestamp: Instant::now(),
        });
        guard.turns.len()
    }

    /// Get a copy of the transcript
    pub async fn history(&self) -> Vec<ChatTurn> {
        self.inner.read().await.turns.clone()
    }
}
