pub mod device_monitor;
pub mod device_status;
pub mod kiosk_client;
pub mod poller;
pub mod session_manager;
