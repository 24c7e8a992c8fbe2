pub mod attachment_controller;
pub mod config_controller;
pub mod health_controller;
pub mod report_controller;
pub mod user_controller;
