// src/config.rs
use std::env;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_MENU: [&str; 4] = [
    "Hot Spicy Ramen",
    "Chicken Noodles",
    "Cheese Noodles",
    "Veg Clear Soup",
];

/// Runtime settings for the kiosk client.
#[derive(Clone, Debug)]
pub struct Config {
    pub backend_url: String,
    pub request_timeout: Duration,
    pub status_poll_interval: Duration,
    pub display_refresh_interval: Duration,
    /// Cached device state older than this is shown as disconnected.
    pub stale_after: Duration,
    /// Product name per dispenser slot; slot `n` is `menu[n - 1]`.
    pub menu: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_millis(5000),
            status_poll_interval: Duration::from_millis(3000),
            display_refresh_interval: Duration::from_millis(1000),
            stale_after: Duration::from_millis(15_000),
            menu: DEFAULT_MENU.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Reads `.env` (if any) and then the `KIOSK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("KIOSK_BACKEND_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if url.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "KIOSK_BACKEND_URL",
                    reason: "must not be empty".to_string(),
                });
            }
            config.backend_url = url;
        }

        read_millis(&lookup, "KIOSK_REQUEST_TIMEOUT_MS", &mut config.request_timeout)?;
        read_millis(&lookup, "KIOSK_STATUS_POLL_MS", &mut config.status_poll_interval)?;
        read_millis(&lookup, "KIOSK_DISPLAY_REFRESH_MS", &mut config.display_refresh_interval)?;
        read_millis(&lookup, "KIOSK_STALE_AFTER_MS", &mut config.stale_after)?;

        if let Some(menu) = lookup("KIOSK_MENU") {
            let items: Vec<String> = menu
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if items.is_empty() {
                return Err(ConfigError::Invalid {
                    key: "KIOSK_MENU",
                    reason: "at least one slot is required".to_string(),
                });
            }
            config.menu = items;
        }

        Ok(config)
    }

    pub fn slot_count(&self) -> u32 {
        self.menu.len() as u32
    }

    pub fn slot_name(&self, slot: u32) -> Option<&str> {
        let index = usize::try_from(slot).ok()?.checked_sub(1)?;
        self.menu.get(index).map(String::as_str)
    }
}

fn read_millis<F>(lookup: &F, key: &'static str, target: &mut Duration) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    let millis: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        reason: format!("expected milliseconds, got '{}'", raw),
    })?;
    if millis == 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    *target = Duration::from_millis(millis);
    Ok(())
}
