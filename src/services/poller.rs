// src/services/poller.rs
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

use super::device_monitor::StatusLine;
use super::kiosk_client::KioskClient;

/// Two independent periodic tasks: one polls `/status`, the other re-derives
/// the status line from cached state. Both stop when this is dropped.
pub struct Poller {
    data: JoinHandle<()>,
    display: JoinHandle<()>,
}

impl Poller {
    pub fn spawn(
        client: KioskClient,
        poll_interval: Duration,
        display_interval: Duration,
    ) -> (Self, watch::Receiver<StatusLine>) {
        let (tx, rx) = watch::channel(StatusLine::default());

        let poll_client = client.clone();
        let data = tokio::spawn(async move {
            let mut ticker = time::interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let state = poll_client.refresh_status().await;
                debug!(device_status = %state.device_status, mqtt = state.mqtt_connected, "status refreshed");
            }
        });

        let device = client.state().device.clone();
        let display = tokio::spawn(async move {
            let mut ticker = time::interval(display_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let line = device.status_line(Instant::now()).await;
                tx.send_if_modified(|current| {
                    if *current == line {
                        false
                    } else {
                        *current = line;
                        true
                    }
                });
                if tx.is_closed() {
                    break;
                }
            }
        });

        (Self { data, display }, rx)
    }

    pub fn shutdown(&self) {
        self.data.abort();
        self.display.abort();
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
