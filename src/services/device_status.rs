use std::fmt;

/// Tagged view over the backend's open-ended `device_status` string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeviceStatus {
    Ready,
    Connecting,
    Disconnected,
    /// `"<action>_busy"` or a bare `"busy"`.
    Busy { action: Option<String> },
    /// `"dispensing_<n>"` or a bare `"dispensing"`.
    Dispensing { slot: Option<u32> },
    Error { raw: String },
    Other { raw: String },
}

impl DeviceStatus {
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim().to_lowercase();

        match s.as_str() {
            "ready" => return DeviceStatus::Ready,
            "connecting" => return DeviceStatus::Connecting,
            "" | "disconnected" | "mqtt_disconnected" | "server_disconnected" => {
                return DeviceStatus::Disconnected;
            }
            "busy" => return DeviceStatus::Busy { action: None },
            "dispensing" => return DeviceStatus::Dispensing { slot: None },
            _ => {}
        }

        if let Some(rest) = s.strip_prefix("dispensing_") {
            return DeviceStatus::Dispensing { slot: rest.parse().ok() };
        }
        if let Some(action) = s.strip_suffix("_busy") {
            return DeviceStatus::Busy { action: Some(action.to_string()) };
        }
        if s == "error" || s.ends_with("_error") {
            return DeviceStatus::Error { raw: raw.trim().to_string() };
        }

        DeviceStatus::Other { raw: raw.trim().to_string() }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DeviceStatus::Ready)
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self, DeviceStatus::Disconnected)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Ready => write!(f, "Ready"),
            DeviceStatus::Connecting => write!(f, "Connecting"),
            DeviceStatus::Disconnected => write!(f, "Disconnected"),
            DeviceStatus::Busy { action: Some(action) } => write!(f, "Busy ({})", action),
            DeviceStatus::Busy { action: None } => write!(f, "Busy"),
            DeviceStatus::Dispensing { slot: Some(slot) } => write!(f, "Dispensing slot {}", slot),
            DeviceStatus::Dispensing { slot: None } => write!(f, "Dispensing"),
            DeviceStatus::Error { raw } => write!(f, "Error ({})", raw),
            DeviceStatus::Other { raw } => write!(f, "{}", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_vocabulary() {
        assert_eq!(DeviceStatus::parse("ready"), DeviceStatus::Ready);
        assert_eq!(DeviceStatus::parse(" READY "), DeviceStatus::Ready);
        assert_eq!(DeviceStatus::parse("connecting"), DeviceStatus::Connecting);
        assert_eq!(DeviceStatus::parse("mqtt_disconnected"), DeviceStatus::Disconnected);
        assert_eq!(DeviceStatus::parse(""), DeviceStatus::Disconnected);
        assert_eq!(
            DeviceStatus::parse("dispensing_2"),
            DeviceStatus::Dispensing { slot: Some(2) }
        );
        assert_eq!(
            DeviceStatus::parse("noodle_3_busy"),
            DeviceStatus::Busy { action: Some("noodle_3".to_string()) }
        );
        assert_eq!(
            DeviceStatus::parse("mqtt_error"),
            DeviceStatus::Error { raw: "mqtt_error".to_string() }
        );
    }

    #[test]
    fn unknown_values_are_kept_verbatim() {
        let status = DeviceStatus::parse("refilling");
        assert_eq!(status, DeviceStatus::Other { raw: "refilling".to_string() });
        assert_eq!(status.to_string(), "refilling");
        assert!(!status.is_ready());
    }

    #[test]
    fn display_text() {
        assert_eq!(DeviceStatus::parse("dispensing_4").to_string(), "Dispensing slot 4");
        assert_eq!(DeviceStatus::parse("motor_busy").to_string(), "Busy (motor)");
    }
}
