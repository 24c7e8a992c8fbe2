use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Extension, Json,
};
use futures::{Stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    adapters::dto::report_http_dto::ListReportDocumentsQuery,
    application::{
        dto::report_dto::{NewCorrectiveReportDTO, NewReportDocumentDTO, ReportFilterDTO},
        error::ApplicationError,
        services::{CorrectiveLog, ReportArchive},
    },
    domain::models::{
        report::{CorrectiveReport, ReportDocument, ReportDocumentDetail},
        user::User,
    },
};

pub struct ReportController;

impl ReportController {
    /// POST /api/v1/reports/documents
    pub async fn create_document(
        State(archive): State<ReportArchive>,
        Extension(user): Extension<User>,
        Json(document): Json<NewReportDocumentDTO>,
    ) -> Result<(StatusCode, Json<ReportDocument>), ApplicationError> {
        let created = archive.create(document, &user).await?;
        Ok((StatusCode::CREATED, Json(created)))
    }

    /// GET /api/v1/reports/documents
    pub async fn list_own_documents(
        State(archive): State<ReportArchive>,
        Extension(user): Extension<User>,
        Query(query): Query<ListReportDocumentsQuery>,
    ) -> Result<Json<Vec<ReportDocument>>, ApplicationError> {
        let filter = ReportFilterDTO::try_from(query)?;
        let documents = archive.list_own(&user, filter).await?;
        info!("Listing {} own reports for user {}", documents.len(), user.uid);
        Ok(Json(documents))
    }

    /// GET /api/v1/reports/documents/all
    pub async fn list_all_documents(
        State(archive): State<ReportArchive>,
        Extension(user): Extension<User>,
        Query(query): Query<ListReportDocumentsQuery>,
    ) -> Result<Json<Vec<ReportDocument>>, ApplicationError> {
        let filter = ReportFilterDTO::try_from(query)?;
        let documents = archive.list_all(&user, &filter).await?;
        info!("Listing {} reports for admin {}", documents.len(), user.uid);
        Ok(Json(documents))
    }

    /// GET /api/v1/reports/documents/{id}
    pub async fn get_document(
        State(archive): State<ReportArchive>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<ReportDocumentDetail>, ApplicationError> {
        Ok(Json(archive.get(&user, id).await?))
    }

    /// DELETE /api/v1/reports/documents/{id}
    pub async fn delete_document(
        State(archive): State<ReportArchive>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, ApplicationError> {
        archive.delete(&user, id).await?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// POST /api/v1/reports/corrective
    pub async fn create_corrective(
        State(log): State<CorrectiveLog>,
        Extension(user): Extension<User>,
        Json(report): Json<NewCorrectiveReportDTO>,
    ) -> Result<(StatusCode, Json<CorrectiveReport>), ApplicationError> {
        let created = log.create(report, &user).await?;
        Ok((StatusCode::CREATED, Json(created)))
    }

    /// GET /api/v1/reports/corrective
    pub async fn list_corrective(
        State(log): State<CorrectiveLog>,
    ) -> Result<Json<Vec<CorrectiveReport>>, ApplicationError> {
        Ok(Json(log.list().await?))
    }

    /// GET /api/v1/reports/corrective/events
    pub async fn corrective_events(
        State(log): State<CorrectiveLog>,
        Extension(user): Extension<User>,
    ) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        info!("User {} subscribed to corrective report events", user.uid);

        let stream = log.subscribe().map(|listing| {
            let event = match listing {
                Ok(listing) => Event::default()
                    .event("snapshot")
                    .id(listing.revision.to_string())
                    .json_data(&listing)
                    .unwrap_or_else(|e| {
                        warn!("Cannot serialize corrective listing: {}", e);
                        Event::default().event("error").data("Internal server error")
                    }),
                Err(e) => {
                    warn!("Corrective listing failed for subscriber: {:?}", e);
                    Event::default().event("error").data("Listing unavailable")
                }
            };
            Ok(event)
        });

        Sse::new(stream).keep_alive(KeepAlive::default())
    }

    /// DELETE /api/v1/reports/corrective/{id}
    pub async fn delete_corrective(
        State(log): State<CorrectiveLog>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, ApplicationError> {
        log.delete(&user, id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
