pub mod attachment;
pub mod report;
pub mod user;
