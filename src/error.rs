// src/error.rs
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Failures of a single backend interaction. The display text is what the
/// user gets to see.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Error connecting to server: {0}")]
    Transport(reqwest::Error),

    #[error("Server did not answer in time")]
    Timeout,

    #[error("Server returned an error ({0})")]
    Status(StatusCode),

    #[error("Unreadable server response: {0}")]
    Decode(String),

    #[error("Device is not ready (status: {status})")]
    NotReady { status: String },

    #[error("Invalid slot {slot} (must be 1-{max})")]
    InvalidSlot { slot: u32, max: u32 },

    #[error("A message is already being sent")]
    InFlight,
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::Status(status)
        } else {
            ClientError::Transport(err)
        }
    }
}
