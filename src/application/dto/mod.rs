pub mod attachment_dto;
pub mod report_dto;
pub mod upload_policy_dto;
pub mod user_dto;
