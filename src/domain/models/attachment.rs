use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type AttachmentId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentStatus {
    /// Metadata exists but fragments may still be missing.
    Uploading,
    /// Every fragment in `0..total_chunks` has been written.
    Completed,
}

impl AttachmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttachmentStatus::Uploading => "uploading",
            AttachmentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for AttachmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uploading" => Ok(AttachmentStatus::Uploading),
            "completed" => Ok(AttachmentStatus::Completed),
            other => Err(format!("unknown attachment status '{}'", other)),
        }
    }
}

/// Label of the selection that switches the category to free text.
pub const CUSTOM_CATEGORY_SELECTION: &str = "Custom";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    LaporanHarian,
    LaporanBulanan,
    ChecklistAlat,
    ChecklistApd,
    Ptw,
    Jse,
    Mop,
    Custom(String),
}

impl Category {
    pub const FIXED: [Category; 7] = [
        Category::LaporanHarian,
        Category::LaporanBulanan,
        Category::ChecklistAlat,
        Category::ChecklistApd,
        Category::Ptw,
        Category::Jse,
        Category::Mop,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::LaporanHarian => "Laporan Harian",
            Category::LaporanBulanan => "Laporan Bulanan",
            Category::ChecklistAlat => "Checklist Alat",
            Category::ChecklistApd => "Checklist APD",
            Category::Ptw => "PTW",
            Category::Jse => "JSE",
            Category::Mop => "MOP",
            Category::Custom(name) => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Category::Custom(_))
    }

    /// Resolves a form selection. `Custom` takes the free-text value, which
    /// must not be blank; any other selection must name a fixed category.
    pub fn from_selection(selected: &str, custom: Option<&str>) -> Result<Category, String> {
        if selected == CUSTOM_CATEGORY_SELECTION {
            let name = custom.map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err("custom category name must not be blank".to_string());
            }
            return Ok(Category::Custom(name.to_string()));
        }

        Self::FIXED
            .iter()
            .find(|c| c.label() == selected)
            .cloned()
            .ok_or_else(|| format!("unknown category '{}'", selected))
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::FIXED
            .iter()
            .find(|c| c.label() == value)
            .cloned()
            .unwrap_or(Category::Custom(value))
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Custom(name) => name,
            fixed => fixed.label().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMetadata {
    pub id: AttachmentId,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub category: Category,
    pub custom_category: Option<String>,
    pub uploaded_by: String,
    pub uploaded_by_email: String,
    pub uploaded_at: DateTime<Utc>,
    pub description: Option<String>,
    pub total_chunks: u32,
    pub status: AttachmentStatus,
}

impl AttachmentMetadata {
    pub fn is_completed(&self) -> bool {
        self.status == AttachmentStatus::Completed
    }
}

/// One fragment of an attachment's encoded payload, keyed by
/// `(attachment_id, index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentChunk {
    pub attachment_id: AttachmentId,
    pub index: u32,
    pub data: String,
}

impl AsRef<str> for AttachmentChunk {
    fn as_ref(&self) -> &str {
        &self.data
    }
}

/// Metadata plus fragments taken from one consistent view of the store.
#[derive(Debug, Clone)]
pub struct AttachmentSnapshot {
    pub metadata: AttachmentMetadata,
    pub chunks: Vec<AttachmentChunk>,
}

/// A full listing emitted to live subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentListing {
    pub revision: u64,
    pub emitted_at: DateTime<Utc>,
    pub attachments: Vec<AttachmentMetadata>,
}
