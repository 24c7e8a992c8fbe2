use async_trait::async_trait;

use crate::{
    application::{
        dto::report_dto::{NewReportDocumentDTO, ReportFilterDTO},
        error::ApplicationError,
    },
    domain::models::report::{ReportDocument, ReportId, ReportPhoto},
};

/// Store for report documents and their photo sub-records. A document and
/// its photos are created and deleted together.
#[async_trait]
pub trait ReportDocumentRepository: Send + Sync {
    /// Persists the document and every photo in one atomic group.
    async fn create_document(
        &self,
        document: NewReportDocumentDTO,
        created_by: &str,
    ) -> Result<ReportDocument, ApplicationError>;

    async fn get_document(&self, id: ReportId) -> Result<ReportDocument, ApplicationError>;

    /// Photos of `id` ordered by index.
    async fn list_photos(&self, id: ReportId) -> Result<Vec<ReportPhoto>, ApplicationError>;

    /// Documents matching `filter`, newest first.
    async fn list_documents(
        &self,
        filter: &ReportFilterDTO,
    ) -> Result<Vec<ReportDocument>, ApplicationError>;

    /// Removes the document and its photos. Returns the removed document
    /// and the number of photos removed.
    async fn delete_document(
        &self,
        id: ReportId,
    ) -> Result<(ReportDocument, u64), ApplicationError>;
}
