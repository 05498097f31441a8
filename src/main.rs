use std::time::Instant;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use noodle_kiosk_client::config::Config;
use noodle_kiosk_client::console::{self, Command};
use noodle_kiosk_client::services::kiosk_client::KioskClient;
use noodle_kiosk_client::services::poller::Poller;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let config = Config::from_env().context("loading configuration")?;
    let client = KioskClient::new(&config).context("building HTTP client")?;

    match client.probe().await {
        Ok(backend) if backend.is_running() => info!(url = %config.backend_url, "backend is running"),
        Ok(backend) => warn!(status = %backend.status, "backend answered but is not running"),
        Err(err) => warn!(url = %config.backend_url, error = %err, "backend not reachable"),
    }

    let (poller, mut status_rx) = Poller::spawn(
        client.clone(),
        config.status_poll_interval,
        config.display_refresh_interval,
    );

    println!("🍜 Noodle kiosk (session {})", client.session_id());
    println!("{}", console::render_menu(&config));
    println!("{}", console::HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = status_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = status_rx.borrow_and_update().to_string();
                println!("[{}]", line);
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match console::parse_command(&line) {
                    Command::Chat(text) => {
                        if !text.is_empty() {
                            println!("You: {}", text);
                        }
                        let outcome = client.send_user_message(&text).await;
                        for out in console::render_chat(&outcome) {
                            println!("{}", out);
                        }
                    }
                    Command::Dispense(slot) => {
                        let name = config.slot_name(slot).unwrap_or("unknown slot");
                        println!("Dispensing {} ({})...", slot, name);
                        println!("{}", console::render_command(&client.manual_dispense(slot).await));
                    }
                    Command::Stop => {
                        println!("{}", console::render_command(&client.emergency_stop().await));
                    }
                    Command::Status => {
                        let line = client.state().device.status_line(Instant::now()).await;
                        println!("[{}]", line);
                    }
                    Command::Logs => match client.recent_logs().await {
                        Ok(logs) if logs.is_empty() => println!("(no logs)"),
                        Ok(logs) => logs.iter().for_each(|l| println!("{}", l)),
                        Err(err) => println!("Failed: {}", err),
                    },
                    Command::Help => println!("{}", console::HELP),
                    Command::Quit => break,
                    Command::Invalid(msg) => println!("{}", msg),
                }
            }
        }
    }

    poller.shutdown();
    Ok(())
}
