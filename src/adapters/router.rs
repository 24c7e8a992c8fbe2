use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    adapters::{
        controllers::{
            attachment_controller::AttachmentController, config_controller::ConfigController,
            health_controller::HealthController, report_controller::ReportController,
            user_controller::UserController,
        },
        middleware::{authenticate, validate_service_secret},
        state::AppState,
    },
    domain::models::report::MAX_REPORT_BODY_SIZE,
};

async fn hello_world() -> &'static str {
    "Hello, world!"
}

pub fn build_router(app_state: AppState, cors: CorsLayer) -> Router {
    // Operator routes that require the X-Service-Secret header
    let service_routes = Router::new()
        .route("/api/v1/health", get(HealthController::health_check))
        .route(
            "/api/v1/attachments/stale",
            delete(AttachmentController::reap_stale),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            validate_service_secret,
        ));

    // Routes that require a bearer token
    let user_routes = Router::new()
        .route("/api/v1/me", get(UserController::me))
        .route("/api/v1/users/{uid}/role", patch(UserController::update_role))
        .route(
            "/api/v1/config/upload-policy",
            get(ConfigController::get_upload_policy).patch(ConfigController::update_upload_policy),
        )
        .route(
            "/api/v1/attachments",
            get(AttachmentController::list)
                // The handler enforces the policy's max size while streaming.
                .post(AttachmentController::upload)
                .layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/api/v1/attachments/events",
            get(AttachmentController::events),
        )
        .route(
            "/api/v1/attachments/{id}",
            get(AttachmentController::get_metadata).delete(AttachmentController::delete),
        )
        .route(
            "/api/v1/attachments/{id}/content",
            get(AttachmentController::download),
        )
        .route(
            "/api/v1/reports/documents",
            get(ReportController::list_own_documents)
                .post(ReportController::create_document)
                .layer(DefaultBodyLimit::max(MAX_REPORT_BODY_SIZE)),
        )
        .route(
            "/api/v1/reports/documents/all",
            get(ReportController::list_all_documents),
        )
        .route(
            "/api/v1/reports/documents/{id}",
            get(ReportController::get_document).delete(ReportController::delete_document),
        )
        .route(
            "/api/v1/reports/corrective",
            get(ReportController::list_corrective)
                .post(ReportController::create_corrective)
                .layer(DefaultBodyLimit::max(MAX_REPORT_BODY_SIZE)),
        )
        .route(
            "/api/v1/reports/corrective/events",
            get(ReportController::corrective_events),
        )
        .route(
            "/api/v1/reports/corrective/{id}",
            delete(ReportController::delete_corrective),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            authenticate,
        ));

    let public_routes = Router::new().route("/", get(hello_world));

    Router::new()
        .merge(service_routes)
        .merge(user_routes)
        .merge(public_routes)
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::Value;
    use tower::ServiceExt;

    use futures::StreamExt;
    use serde_json::json;

    use super::*;
    use crate::{
        adapters::{
            middleware::{AuthClaims, SERVICE_SECRET_HEADER},
            repositories::{
                MemoryAttachmentRepository, MemoryCorrectiveReportRepository,
                MemoryReportDocumentRepository, MemoryUploadPolicyRepository,
                MemoryUserRepository,
            },
        },
        application::{
            dto::attachment_dto::NewAttachmentDTO,
            repositories::attachment_repository::AttachmentRepository,
            services::{AttachmentStore, ChangeFeed, CorrectiveLog, ReportArchive, UserDirectory},
        },
        domain::{
            config::{
                secrets::Secrets,
                server::Backend,
                upload::{UploadPolicy, MAX_DESCRIPTION_LENGTH},
            },
            models::attachment::Category,
            payload::encode_data_url,
        },
    };

    const JWT_SECRET: &str = "test-jwt-secret";
    const SERVICE_SECRET: &str = "test-service-secret";
    const ADMIN_EMAIL: &str = "admin@example.com";
    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn test_app() -> Router {
        test_app_with_repository().0
    }

    /// The router plus its attachment backend, for seeding records the
    /// HTTP surface cannot create.
    fn test_app_with_repository() -> (Router, Arc<MemoryAttachmentRepository>) {
        let repository = Arc::new(MemoryAttachmentRepository::new());
        let store = AttachmentStore::new(
            repository.clone(),
            UploadPolicy::default(),
            ChangeFeed::new(16),
        );
        let state = AppState {
            backend: Backend::Memory,
            secrets: Arc::new(Secrets {
                auth_jwt_secret: JWT_SECRET.to_string(),
                service_secret: SERVICE_SECRET.to_string(),
            }),
            stale_upload_timeout: Duration::from_secs(3600),
            attachment_store: store,
            user_directory: UserDirectory::new(
                Arc::new(MemoryUserRepository::new()),
                &[ADMIN_EMAIL.to_string()],
            ),
            upload_policy_repository: Arc::new(MemoryUploadPolicyRepository::new()),
            report_archive: ReportArchive::new(Arc::new(MemoryReportDocumentRepository::new())),
            corrective_log: CorrectiveLog::new(
                Arc::new(MemoryCorrectiveReportRepository::new()),
                ChangeFeed::new(16),
            ),
        };
        (build_router(state, CorsLayer::permissive()), repository)
    }

    fn bearer(uid: &str, email: &str) -> String {
        let claims = AuthClaims {
            sub: uid.to_string(),
            email: email.to_string(),
            exp: (Utc::now().timestamp() + 600) as u64,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
        )
        .unwrap();
        format!("Bearer {}", token)
    }

    fn admin() -> String {
        bearer("admin-uid", ADMIN_EMAIL)
    }

    fn engineer() -> String {
        bearer("engineer-uid", "engineer@example.com")
    }

    fn multipart_body(file_name: &str, mime: &str, content: &[u8], category: &str) -> Vec<u8> {
        multipart_body_with(file_name, mime, content, &[("category", category)])
    }

    fn multipart_body_with(
        file_name: &str,
        mime: &str,
        content: &[u8],
        fields: &[(&str, &str)],
    ) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "\r\n--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(auth: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/attachments")
            .header(header::AUTHORIZATION, auth)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn authed(method: Method, uri: &str, auth: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, auth)
            .body(Body::empty())
            .unwrap()
    }

    fn json_request(method: Method, uri: &str, auth: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, auth)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// First frame of a server-sent event stream, as text.
    async fn first_event(response: Response) -> String {
        let mut frames = response.into_body().into_data_stream();
        let frame = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .expect("no event within 5s")
            .unwrap()
            .unwrap();
        String::from_utf8(frame.to_vec()).unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn upload_pdf(app: &Router, content: &[u8]) -> String {
        let body = multipart_body("report.pdf", "application/pdf", content, "Laporan Harian");
        let response = app
            .clone()
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["status"], "completed");
        json["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn root_is_public() {
        let response = test_app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn attachment_routes_require_a_bearer_token() {
        let response = test_app()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/attachments")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = test_app()
            .oneshot(authed(Method::GET, "/api/v1/attachments", "Bearer not-a-jwt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn first_sign_in_assigns_default_roles() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(authed(Method::GET, "/api/v1/me", &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["role"], "admin");

        let response = app
            .oneshot(authed(Method::GET, "/api/v1/me", &engineer()))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["role"], "engineer");
    }

    #[tokio::test]
    async fn uploaded_file_downloads_byte_for_byte() {
        let app = test_app();
        let content: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let id = upload_pdf(&app, &content).await;

        let response = app
            .clone()
            .oneshot(authed(
                Method::GET,
                &format!("/api/v1/attachments/{}/content", id),
                &engineer(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"report.pdf\""
        );
        assert_eq!(body_bytes(response).await, content);

        let response = app
            .oneshot(authed(Method::GET, "/api/v1/attachments", &engineer()))
            .await
            .unwrap();
        let listing = body_json(response).await;
        assert_eq!(listing.as_array().unwrap().len(), 1);
        assert_eq!(listing[0]["category"], "Laporan Harian");
        assert_eq!(listing[0]["uploadedByEmail"], "engineer@example.com");
    }

    #[tokio::test]
    async fn disallowed_types_and_unknown_categories_are_rejected() {
        let app = test_app();

        let body = multipart_body("notes.txt", "text/plain", b"hello", "Laporan Harian");
        let response = app
            .clone()
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let body = multipart_body("a.pdf", "application/pdf", b"%PDF", "Not A Category");
        let response = app
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn only_admins_delete_attachments() {
        let app = test_app();
        let id = upload_pdf(&app, b"%PDF-1.7 body").await;
        let uri = format!("/api/v1/attachments/{}", id);

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, &uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, &uri, &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed(Method::GET, &format!("{}/content", uri), &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn policy_changes_are_admin_only_and_take_effect() {
        let app = test_app();
        let patch = |auth: String, body: &'static str| {
            Request::builder()
                .method(Method::PATCH)
                .uri("/api/v1/config/upload-policy")
                .header(header::AUTHORIZATION, auth)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap()
        };

        let response = app
            .clone()
            .oneshot(patch(engineer(), r#"{"maxSize": 4}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(patch(admin(), r#"{"maxSize": 4}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["maxSize"], 4);

        let body = multipart_body("big.pdf", "application/pdf", b"%PDF-1.7", "Laporan Harian");
        let response = app
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn service_routes_require_the_service_secret() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, "/api/v1/attachments/stale", &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/v1/attachments/stale")
                    .header(SERVICE_SECRET_HEADER, SERVICE_SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["deletedCount"], 0);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header(SERVICE_SECRET_HEADER, SERVICE_SECRET)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["backend"], "memory");
    }

    #[tokio::test]
    async fn overlong_text_fields_are_rejected_before_storing() {
        let app = test_app();
        let description = "x".repeat(64 * 1024);
        let body = multipart_body_with(
            "report.pdf",
            "application/pdf",
            b"%PDF-1.7",
            &[("category", "Laporan Harian"), ("description", description.as_str())],
        );
        let response = app
            .clone()
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "description is too long");

        let response = app
            .oneshot(authed(
                Method::GET,
                "/api/v1/attachments?includeIncomplete=true",
                &admin(),
            ))
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn description_at_the_limit_is_accepted() {
        let app = test_app();
        let description = "x".repeat(MAX_DESCRIPTION_LENGTH);
        let body = multipart_body_with(
            "report.pdf",
            "application/pdf",
            b"%PDF-1.7",
            &[("category", "Laporan Harian"), ("description", description.as_str())],
        );
        let response = app
            .oneshot(upload_request(&engineer(), body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn incomplete_listing_is_admin_only() {
        let app = test_app();
        let uri = "/api/v1/attachments?includeIncomplete=true";

        let response = app
            .clone()
            .oneshot(authed(Method::GET, uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(authed(Method::GET, uri, &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unfinished_uploads_are_not_served() {
        let (app, repository) = test_app_with_repository();
        let pending = repository
            .create_metadata(NewAttachmentDTO {
                file_name: "half.pdf".to_string(),
                file_type: "application/pdf".to_string(),
                file_size: 2_000_000,
                category: Category::from("Laporan Harian".to_string()),
                custom_category: None,
                uploaded_by: "engineer-uid".to_string(),
                uploaded_by_email: "engineer@example.com".to_string(),
                description: None,
                total_chunks: 3,
            })
            .await
            .unwrap();
        let uri = format!("/api/v1/attachments/{}", pending.id);

        for auth in [engineer(), admin()] {
            let response = app
                .clone()
                .oneshot(authed(Method::GET, &format!("{}/content", uri), &auth))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CONFLICT);
        }

        let response = app
            .clone()
            .oneshot(authed(Method::GET, &uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .oneshot(authed(Method::GET, &uri, &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "uploading");
    }

    #[tokio::test]
    async fn event_stream_opens_with_a_snapshot() {
        let app = test_app();
        upload_pdf(&app, b"%PDF-1.7 body").await;

        let response = app
            .oneshot(authed(Method::GET, "/api/v1/attachments/events", &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let event = first_event(response).await;
        assert!(event.contains("event: snapshot"), "{}", event);
        assert!(event.contains("report.pdf"), "{}", event);
    }

    fn report_document(photo: &str) -> Value {
        json!({
            "type": "pdf",
            "fileName": "Genset_Check_2024-03-05.pdf",
            "maintenanceName": "Genset check",
            "maintenanceTime": "2024-03-05T14:30",
            "specificDetail": "Rack B",
            "fileSize": 4096,
            "totalPhotos": 1,
            "photos": [{ "index": 1, "photoBase64": photo, "description": "Panel" }]
        })
    }

    #[tokio::test]
    async fn report_documents_are_scoped_to_their_creator() {
        let app = test_app();
        let photo = encode_data_url("image/jpeg", &[0xFF, 0xD8, 0xFF]);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/reports/documents",
                &engineer(),
                report_document(&photo),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["createdBy"], "engineer@example.com");
        assert_eq!(created["photosWithImage"], 1);
        let uri = format!("/api/v1/reports/documents/{}", created["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(authed(Method::GET, "/api/v1/reports/documents", &engineer()))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 1);

        let response = app
            .clone()
            .oneshot(authed(Method::GET, "/api/v1/reports/documents/all", &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        for (query, expected) in [("type=excel", 0), ("type=pdf&date=2024-03-05", 1)] {
            let response = app
                .clone()
                .oneshot(authed(
                    Method::GET,
                    &format!("/api/v1/reports/documents/all?{}", query),
                    &admin(),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json(response).await.as_array().unwrap().len(), expected);
        }

        let stranger = bearer("stranger-uid", "stranger@example.com");
        let response = app
            .clone()
            .oneshot(authed(Method::GET, &uri, &stranger))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(authed(Method::GET, &uri, &engineer()))
            .await
            .unwrap();
        let detail = body_json(response).await;
        assert_eq!(detail["photos"][0]["photoBase64"], photo.as_str());

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, &uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed(Method::GET, &uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn report_documents_reject_non_image_photos() {
        let photo = encode_data_url("application/pdf", b"%PDF");
        let response = test_app()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/reports/documents",
                &engineer(),
                report_document(&photo),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn corrective_reports_are_filed_by_standby_engineers() {
        let app = test_app();
        let standby = bearer("standby-uid", "standby@example.com");
        let report = json!({
            "issue": "Rectifier alarm",
            "actionTaken": "Reseated module",
            "status": "InProgress",
            "location": "Site A",
            "photoBase64": encode_data_url("image/png", &[0x89, 0x50, 0x4E, 0x47]),
        });

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/reports/corrective",
                &standby,
                report.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::PATCH,
                "/api/v1/users/standby-uid/role",
                &admin(),
                json!({ "role": "standby_engineer" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                Method::POST,
                "/api/v1/reports/corrective",
                &standby,
                report,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["reportedBy"], "standby-uid");
        assert_eq!(created["status"], "InProgress");
        let uri = format!("/api/v1/reports/corrective/{}", created["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(authed(Method::GET, "/api/v1/reports/corrective/events", &engineer()))
            .await
            .unwrap();
        let event = first_event(response).await;
        assert!(event.contains("event: snapshot"), "{}", event);
        assert!(event.contains("Rectifier alarm"), "{}", event);

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, &uri, &engineer()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app
            .clone()
            .oneshot(authed(Method::DELETE, &uri, &admin()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(authed(Method::GET, "/api/v1/reports/corrective", &engineer()))
            .await
            .unwrap();
        assert!(body_json(response).await.as_array().unwrap().is_empty());
    }
}
