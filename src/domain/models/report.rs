use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ReportId = Uuid;

/// Largest decoded size of one report photo.
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;
pub const MAX_PHOTOS_PER_DOCUMENT: usize = 50;
/// Longest accepted free-text field on a report, in bytes.
pub const MAX_REPORT_TEXT_LENGTH: usize = 2_000;
/// Body limit for report routes; photos travel inline as data URLs.
pub const MAX_REPORT_BODY_SIZE: usize = 32 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Excel,
    Pdf,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Excel => "excel",
            DocumentType::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excel" => Ok(DocumentType::Excel),
            "pdf" => Ok(DocumentType::Pdf),
            other => Err(format!("unknown document type '{}'", other)),
        }
    }
}

/// Metadata of a generated maintenance report (Excel or PDF). The file
/// itself is produced client side; only its description is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub id: ReportId,
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub file_name: String,
    pub maintenance_name: String,
    /// Local date-time as entered, `YYYY-MM-DDTHH:MM`.
    pub maintenance_time: String,
    pub specific_detail: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Email of the creator.
    pub created_by: String,
    pub file_size: u64,
    pub total_photos: u32,
    pub photos_with_image: u32,
}

impl ReportDocument {
    pub fn maintenance_date(&self) -> Option<NaiveDate> {
        maintenance_date(&self.maintenance_time)
    }

    pub fn is_created_by(&self, email: &str) -> bool {
        self.created_by.eq_ignore_ascii_case(email)
    }
}

/// Calendar date of a `YYYY-MM-DD...` maintenance time.
pub fn maintenance_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.get(..10)?, "%Y-%m-%d").ok()
}

/// One photo of a report document, numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPhoto {
    pub document_id: ReportId,
    pub index: u32,
    /// Image data URL.
    pub photo_base64: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocumentDetail {
    #[serde(flatten)]
    pub document: ReportDocument,
    pub photos: Vec<ReportPhoto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectiveStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl CorrectiveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectiveStatus::Open => "Open",
            CorrectiveStatus::InProgress => "InProgress",
            CorrectiveStatus::Resolved => "Resolved",
        }
    }
}

impl FromStr for CorrectiveStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(CorrectiveStatus::Open),
            "InProgress" => Ok(CorrectiveStatus::InProgress),
            "Resolved" => Ok(CorrectiveStatus::Resolved),
            other => Err(format!("unknown corrective status '{}'", other)),
        }
    }
}

/// A corrective maintenance entry filed by a standby engineer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveReport {
    pub id: ReportId,
    pub issue: String,
    pub action_taken: String,
    pub spare_parts: Option<String>,
    pub status: CorrectiveStatus,
    pub location: String,
    pub photo_base64: String,
    pub photo_description: Option<String>,
    pub reported_by: String,
    pub reported_by_email: String,
    pub reported_at: DateTime<Utc>,
}

/// Every corrective report at one revision, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectiveListing {
    pub revision: u64,
    pub emitted_at: DateTime<Utc>,
    pub reports: Vec<CorrectiveReport>,
}
