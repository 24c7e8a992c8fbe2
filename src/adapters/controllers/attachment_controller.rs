use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        Response,
    },
    Extension, Json,
};
use futures::{Stream, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    adapters::{
        dto::attachment_http_dto::{AttachmentResponse, ListAttachmentsQuery},
        middleware::require_admin,
        state::AppState,
    },
    application::{
        dto::attachment_dto::AttachmentFilterDTO,
        error::ApplicationError,
        services::{AttachmentStore, ReapReport, UploadRequest},
    },
    domain::{
        config::upload::{MAX_CATEGORY_LENGTH, MAX_DESCRIPTION_LENGTH},
        models::{attachment::Category, user::User},
    },
};

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

pub struct AttachmentController;

struct UploadedFile {
    file_name: String,
    mime_type: String,
    content: Vec<u8>,
}

/// Reads a text part, rejecting it once it grows past `limit` bytes.
async fn read_text_field(mut field: Field<'_>, limit: usize) -> Result<String, ApplicationError> {
    let name = field.name().unwrap_or("").to_string();
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| {
        warn!("Invalid {} field: {}", name, e);
        ApplicationError::BadRequest("Invalid request data".to_string())
    })? {
        if bytes.len() + chunk.len() > limit {
            warn!("Field {} exceeds {} bytes", name, limit);
            return Err(ApplicationError::BadRequest(format!("{} is too long", name)));
        }
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| {
        warn!("Field {} is not valid UTF-8", name);
        ApplicationError::BadRequest("Invalid request data".to_string())
    })
}

/// Reads the file part, giving up as soon as it grows past `max_size`.
async fn read_file_field(
    mut field: Field<'_>,
    max_size: u64,
) -> Result<UploadedFile, ApplicationError> {
    let file_name = field.file_name().unwrap_or_default().trim().to_string();
    let mime_type = field
        .content_type()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string();

    let mut content = Vec::new();
    while let Some(bytes) = field.chunk().await.map_err(|e| {
        warn!("Cannot read file bytes: {}", e);
        ApplicationError::BadRequest("Invalid file data".to_string())
    })? {
        if (content.len() + bytes.len()) as u64 > max_size {
            warn!(
                "Upload of '{}' exceeds the {} byte limit, aborting",
                file_name, max_size
            );
            return Err(ApplicationError::PayloadTooLarge);
        }
        content.extend_from_slice(&bytes);
    }

    Ok(UploadedFile {
        file_name,
        mime_type,
        content,
    })
}

fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

impl AttachmentController {
    /// POST /api/v1/attachments
    pub async fn upload(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        mut multipart: Multipart,
    ) -> Result<(StatusCode, Json<AttachmentResponse>), ApplicationError> {
        let max_size = store.policy().await.max_size;

        let mut file: Option<UploadedFile> = None;
        let mut category: Option<String> = None;
        let mut custom_category: Option<String> = None;
        let mut description: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("Invalid multipart data: {}", e);
            ApplicationError::BadRequest("Invalid request format".to_string())
        })? {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "file" => file = Some(read_file_field(field, max_size).await?),
                "category" => category = Some(read_text_field(field, MAX_CATEGORY_LENGTH).await?),
                "customCategory" => {
                    custom_category = Some(read_text_field(field, MAX_CATEGORY_LENGTH).await?)
                }
                "description" => {
                    description = Some(read_text_field(field, MAX_DESCRIPTION_LENGTH).await?)
                }
                _ => warn!("Ignoring unknown multipart field: {}", name),
            }
        }

        let file = file.ok_or_else(|| ApplicationError::BadRequest("File is required".to_string()))?;
        let selected = category
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApplicationError::BadRequest("Category is required".to_string()))?;
        let category = Category::from_selection(selected.trim(), custom_category.as_deref())
            .map_err(ApplicationError::BadRequest)?;

        info!(
            "User {} uploading '{}' ({}, {} bytes) into {}",
            user.uid,
            file.file_name,
            file.mime_type,
            file.content.len(),
            category
        );

        let metadata = store
            .upload(
                UploadRequest {
                    file_name: file.file_name,
                    mime_type: file.mime_type,
                    content: file.content,
                    category,
                    description,
                },
                &user,
            )
            .await?;

        Ok((StatusCode::CREATED, Json(metadata.into())))
    }

    /// GET /api/v1/attachments
    pub async fn list(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        Query(query): Query<ListAttachmentsQuery>,
    ) -> Result<Json<Vec<AttachmentResponse>>, ApplicationError> {
        if query.include_incomplete {
            require_admin(&user)?;
        }
        let filter = AttachmentFilterDTO::from(query);
        let attachments = store.list(&filter).await?;
        info!("Listing {} attachments for user {}", attachments.len(), user.uid);
        Ok(Json(
            attachments.into_iter().map(AttachmentResponse::from).collect(),
        ))
    }

    /// GET /api/v1/attachments/events
    ///
    /// Server-sent events: one `snapshot` event with the full listing on
    /// connect and after every change.
    pub async fn events(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        Query(query): Query<ListAttachmentsQuery>,
    ) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApplicationError> {
        if query.include_incomplete {
            require_admin(&user)?;
        }
        info!("User {} subscribed to attachment events", user.uid);

        let stream = store.subscribe(query.into()).map(|listing| {
            let event = match listing {
                Ok(listing) => Event::default()
                    .event("snapshot")
                    .id(listing.revision.to_string())
                    .json_data(&listing)
                    .unwrap_or_else(|e| {
                        warn!("Cannot serialize attachment listing: {}", e);
                        Event::default().event("error").data("Internal server error")
                    }),
                Err(e) => {
                    warn!("Attachment listing failed for subscriber: {:?}", e);
                    Event::default().event("error").data("Listing unavailable")
                }
            };
            Ok(event)
        });

        Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
    }

    /// GET /api/v1/attachments/{id}
    pub async fn get_metadata(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<Json<AttachmentResponse>, ApplicationError> {
        let metadata = store.get(id).await?;
        // Unfinished uploads are hidden from listings for non-admins too.
        if !metadata.is_completed() {
            require_admin(&user)?;
        }
        Ok(Json(metadata.into()))
    }

    /// GET /api/v1/attachments/{id}/content
    pub async fn download(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<Response, ApplicationError> {
        let attachment = store.read(id).await?;
        info!(
            "User {} downloading attachment {} ({} bytes)",
            user.uid,
            id,
            attachment.content.len()
        );

        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, attachment.mime_type)
            .header(header::CONTENT_LENGTH, attachment.content.len())
            .header(
                header::CONTENT_DISPOSITION,
                content_disposition(&attachment.metadata.file_name),
            )
            .body(Body::from(attachment.content))
            .map_err(|e| ApplicationError::InternalError(e.to_string()))
    }

    /// DELETE /api/v1/attachments/{id}
    pub async fn delete(
        State(store): State<AttachmentStore>,
        Extension(user): Extension<User>,
        Path(id): Path<Uuid>,
    ) -> Result<StatusCode, ApplicationError> {
        require_admin(&user)?;
        let metadata = store.delete(id).await?;
        info!(
            "User {} deleted attachment {} ('{}')",
            user.uid, id, metadata.file_name
        );
        Ok(StatusCode::NO_CONTENT)
    }

    /// DELETE /api/v1/attachments/stale
    pub async fn reap_stale(
        State(app_state): State<AppState>,
    ) -> Result<Json<ReapReport>, ApplicationError> {
        info!(
            "Reaping uploads older than {}s",
            app_state.stale_upload_timeout.as_secs()
        );
        let report = app_state
            .attachment_store
            .reap_stale(app_state.stale_upload_timeout)
            .await?;
        Ok(Json(report))
    }
}

#[cfg(test)]
mod tests {
    use super::content_disposition;

    #[test]
    fn quotes_in_file_names_do_not_break_the_header() {
        assert_eq!(
            content_disposition("a\"b.pdf"),
            "attachment; filename=\"a_b.pdf\""
        );
    }
}
