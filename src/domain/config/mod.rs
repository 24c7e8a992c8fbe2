pub mod secrets;
pub mod server;
pub mod upload;
