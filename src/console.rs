// src/console.rs
use crate::config::Config;
use crate::services::kiosk_client::{ChatOutcome, CommandOutcome};

pub const HELP: &str = "\
Type a message to chat with the noodle assistant.
  /dispense N   dispense slot N directly (device must be ready)
  /stop         emergency stop
  /status       show the current device status
  /logs         show recent backend logs
  /help         show this help
  /quit         leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Chat(String),
    Dispense(u32),
    Stop,
    Status,
    Logs,
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Command::Chat(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    match parts.next().unwrap_or_default() {
        "dispense" => match parts.next().map(str::parse::<u32>) {
            Some(Ok(slot)) => Command::Dispense(slot),
            _ => Command::Invalid("usage: /dispense N".to_string()),
        },
        "stop" => Command::Stop,
        "status" => Command::Status,
        "logs" => Command::Logs,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Invalid(format!("unknown command '/{}', try /help", other)),
    }
}

/// Lines to print for one chat exchange.
pub fn render_chat(outcome: &ChatOutcome) -> Vec<String> {
    match outcome {
        ChatOutcome::Ignored => Vec::new(),
        ChatOutcome::Failed { cause } => vec![format!("AI: {}", cause)],
        ChatOutcome::Replied(reply) => {
            let mut lines = Vec::new();
            if let Some(text) = &reply.reply {
                lines.push(format!("AI: {}", text));
            }
            if let Some(action) = &reply.action {
                lines.push(format!("  > {}", action));
            }
            if let Some(warning) = &reply.warning {
                lines.push(format!("  ! {}", warning));
            }
            if let Some(error) = &reply.error {
                lines.push(format!("  x {}", error));
            }
            if reply.confirmed {
                lines.push("  > Order confirmed".to_string());
            } else if let Some(order) = &reply.pending_order {
                lines.push(format!("  ? Pending order: {}", order));
            }
            lines
        }
    }
}

pub fn render_command(outcome: &CommandOutcome) -> String {
    if outcome.success {
        format!("OK: {}", outcome.message)
    } else {
        format!("Failed: {}", outcome.message)
    }
}

pub fn render_menu(config: &Config) -> String {
    config
        .menu
        .iter()
        .enumerate()
        .map(|(i, name)| format!("  {}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::kiosk_client::ChatReply;
    use serde_json::json;

    #[test]
    fn parses_commands() {
        assert_eq!(parse_command("  I want noodle 2 "), Command::Chat("I want noodle 2".to_string()));
        assert_eq!(parse_command("/dispense 3"), Command::Dispense(3));
        assert_eq!(parse_command("/stop"), Command::Stop);
        assert_eq!(parse_command("/exit"), Command::Quit);
        assert!(matches!(parse_command("/dispense two"), Command::Invalid(_)));
        assert!(matches!(parse_command("/dance"), Command::Invalid(_)));
    }

    #[test]
    fn renders_pending_order_and_confirmation() {
        let pending = ChatOutcome::Replied(ChatReply {
            reply: Some("Order placed".to_string()),
            pending_order: Some(json!({"item": 2})),
            ..Default::default()
        });
        let lines = render_chat(&pending);
        assert_eq!(lines[0], "AI: Order placed");
        assert!(lines[1].contains("\"item\":2"));

        let confirmed = ChatOutcome::Replied(ChatReply {
            reply: Some("Confirmed!".to_string()),
            confirmed: true,
            ..Default::default()
        });
        assert_eq!(render_chat(&confirmed)[1], "  > Order confirmed");
        assert!(render_chat(&ChatOutcome::Ignored).is_empty());
    }

    #[test]
    fn renders_menu() {
        let menu = render_menu(&Config::default());
        assert!(menu.starts_with("  1. Hot Spicy Ramen"));
        assert!(menu.ends_with("4. Veg Clear Soup"));
    }
}
