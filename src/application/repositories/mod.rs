pub mod attachment_repository;
pub mod corrective_report_repository;
pub mod report_document_repository;
pub mod upload_policy_repository;
pub mod user_repository;
