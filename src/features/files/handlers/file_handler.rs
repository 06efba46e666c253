use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use futures::{StreamExt, TryStreamExt};
use std::io;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DeleteFileResponseDto, FileSummaryDto, UploadFileDto, DEFAULT_MIME_TYPE,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ApiResponse, Meta};

/// Upload a file
///
/// Accepts multipart/form-data with a single `file` field. The content is
/// written to storage as it arrives.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileSummaryDto>),
        (status = 400, description = "Missing file or interrupted upload"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "File too large")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileSummaryDto>>), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::Validation("Filename is required".to_string()))?;
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        let body = field.map_err(io::Error::other).boxed();
        let file = service
            .upload(user.id, &file_name, &content_type, body)
            .await?;

        return Ok((
            StatusCode::CREATED,
            Json(ApiResponse::success(
                Some(FileSummaryDto::from(file)),
                Some("File uploaded successfully".to_string()),
                None,
            )),
        ));
    }

    Err(AppError::BadRequest("File is required".to_string()))
}

/// List the caller's files, most recent first
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    responses(
        (status = 200, description = "Files owned by the caller", body = ApiResponse<Vec<FileSummaryDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileSummaryDto>>>, AppError> {
    let files = service.list(user.id).await?;
    let total = files.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Download one of the caller's files
#[utoipa::path(
    get,
    path = "/api/files/{id}/download",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content streamed with its recorded Content-Type"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let file_id = parse_file_id(&id)?;
    let download = service.download(user.id, file_id).await?;

    let content_type = HeaderValue::from_str(&download.mime_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_MIME_TYPE));
    let disposition = HeaderValue::from_str(&content_disposition(&download.original_name))
        .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {}", e)))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, download.size_bytes)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(download.body))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))
}

/// Delete one of the caller's files
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    let file_id = parse_file_id(&id)?;
    service.delete(user.id, file_id).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// A malformed id can't name any file
fn parse_file_id(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound("File not found".to_string()))
}

/// `attachment` disposition with an ASCII fallback and the RFC 5987 form
fn content_disposition(original_name: &str) -> String {
    let fallback: String = original_name
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(original_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use crate::features::files::catalog::memory::InMemoryFileCatalog;
    use crate::features::files::routes;
    use crate::modules::storage::LocalContentStore;
    use crate::shared::test_helpers::{create_test_user, with_test_user};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;
    use tempfile::TempDir;

    const MAX_FILE_SIZE: u64 = 64 * 1024;

    async fn file_service(dir: &TempDir) -> Arc<FileService> {
        let content = LocalContentStore::new(&StorageConfig {
            root: dir.path().to_path_buf(),
            max_file_size: MAX_FILE_SIZE,
        })
        .await
        .unwrap();

        Arc::new(FileService::new(
            Arc::new(content),
            Arc::new(InMemoryFileCatalog::new()),
        ))
    }

    fn server_as(service: Arc<FileService>, username: &str) -> TestServer {
        let app = with_test_user(
            routes(service, MAX_FILE_SIZE),
            create_test_user(username),
        );
        TestServer::new(app).unwrap()
    }

    fn report_form(data: Vec<u8>) -> MultipartForm {
        MultipartForm::new().add_part(
            "file",
            Part::bytes(data)
                .file_name("report.pdf")
                .mime_type("application/pdf"),
        )
    }

    #[tokio::test]
    async fn test_upload_list_download_delete() {
        let dir = TempDir::new().unwrap();
        let server = server_as(file_service(&dir).await, "alice");
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 256) as u8).collect();

        let response = server
            .post("/api/files/upload")
            .multipart(report_form(data.clone()))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["data"]["originalName"], "report.pdf");
        assert_eq!(body["data"]["sizeBytes"], 10_000);
        assert_eq!(body["data"]["mimeType"], "application/pdf");
        assert!(body["data"].get("storedName").is_none());
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let response = server.get("/api/files").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], 1);
        assert_eq!(body["data"][0]["id"], id.as_str());

        let response = server.get(&format!("/api/files/{}/download", id)).await;
        response.assert_status_ok();
        assert_eq!(response.header("content-type"), "application/pdf");
        assert_eq!(response.header("content-length"), "10000");
        assert_eq!(
            response.header("content-disposition"),
            "attachment; filename=\"report.pdf\"; filename*=UTF-8''report.pdf"
        );
        assert_eq!(response.as_bytes().to_vec(), data);

        let response = server.delete(&format!("/api/files/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["deleted"], true);

        server
            .get(&format!("/api/files/{}/download", id))
            .await
            .assert_status_not_found();
        server
            .delete(&format!("/api/files/{}", id))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn test_other_user_sees_not_found() {
        let dir = TempDir::new().unwrap();
        let service = file_service(&dir).await;
        let alice = server_as(service.clone(), "alice");
        let bob = server_as(service, "bob");

        let response = alice
            .post("/api/files/upload")
            .multipart(report_form(b"confidential".to_vec()))
            .await;
        let body: Value = response.json();
        let id = body["data"]["id"].as_str().unwrap().to_string();

        let foreign = bob.get(&format!("/api/files/{}/download", id)).await;
        foreign.assert_status_not_found();
        let missing = bob
            .get(&format!("/api/files/{}/download", Uuid::new_v4()))
            .await;
        missing.assert_status_not_found();
        assert_eq!(foreign.text(), missing.text());

        bob.delete(&format!("/api/files/{}", id))
            .await
            .assert_status_not_found();

        let body: Value = bob.get("/api/files").await.json();
        assert_eq!(body["meta"]["total"], 0);

        alice
            .get(&format!("/api/files/{}/download", id))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_rejected() {
        let dir = TempDir::new().unwrap();
        let server = server_as(file_service(&dir).await, "alice");

        let form = MultipartForm::new().add_text("note", "no file here");
        server
            .post("/api/files/upload")
            .multipart(form)
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_upload_without_content_type_defaults() {
        let dir = TempDir::new().unwrap();
        let server = server_as(file_service(&dir).await, "alice");

        let form = MultipartForm::new()
            .add_part("file", Part::bytes(b"raw".to_vec()).file_name("data.bin"));
        let response = server.post("/api/files/upload").multipart(form).await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["mimeType"], DEFAULT_MIME_TYPE);
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_payload_too_large() {
        let dir = TempDir::new().unwrap();
        let server = server_as(file_service(&dir).await, "alice");

        let response = server
            .post("/api/files/upload")
            .multipart(report_form(vec![0u8; MAX_FILE_SIZE as usize + 1]))
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

        let body: Value = server.get("/api/files").await.json();
        assert_eq!(body["meta"]["total"], 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let dir = TempDir::new().unwrap();
        let server = server_as(file_service(&dir).await, "alice");

        server
            .get("/api/files/not-a-uuid/download")
            .await
            .assert_status_not_found();
        server
            .delete("/api/files/not-a-uuid")
            .await
            .assert_status_not_found();
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        assert_eq!(
            content_disposition("résumé \"final\".pdf"),
            "attachment; filename=\"r_sum_ _final_.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9%20%22final%22.pdf"
        );
    }
}
