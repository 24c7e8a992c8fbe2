mod attachment_store;
mod change_feed;
mod corrective_log;
mod reaper;
mod report_archive;
mod user_directory;

pub use attachment_store::{AttachmentStore, ReapReport, UploadRequest};
pub use change_feed::ChangeFeed;
pub use corrective_log::CorrectiveLog;
pub use reaper::spawn_reaper;
pub use report_archive::ReportArchive;
pub use user_directory::UserDirectory;
