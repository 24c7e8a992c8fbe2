mod memory_attachment_repository;
mod memory_corrective_report_repository;
mod memory_report_document_repository;
mod memory_upload_policy_repository;
mod memory_user_repository;
mod pg_attachment_repository;
mod pg_corrective_report_repository;
mod pg_report_document_repository;
mod pg_upload_policy_repository;
mod pg_user_repository;

pub use memory_attachment_repository::MemoryAttachmentRepository;
pub use memory_corrective_report_repository::MemoryCorrectiveReportRepository;
pub use memory_report_document_repository::MemoryReportDocumentRepository;
pub use memory_upload_policy_repository::MemoryUploadPolicyRepository;
pub use memory_user_repository::MemoryUserRepository;
pub use pg_attachment_repository::PgAttachmentRepository;
pub use pg_corrective_report_repository::PgCorrectiveReportRepository;
pub use pg_report_document_repository::PgReportDocumentRepository;
pub use pg_upload_policy_repository::PgUploadPolicyRepository;
pub use pg_user_repository::PgUserRepository;
