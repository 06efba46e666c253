use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::dtos::MULTIPART_OVERHEAD;
use crate::features::files::handlers::{delete_file, download_file, list_files, upload_file};
use crate::features::files::services::FileService;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_file_size: u64) -> Router {
    // Let the content store enforce the exact cap; the body limit only bounds
    // multipart framing on top of it
    let body_limit = usize::try_from(max_file_size)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route(
            "/api/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/api/files", get(list_files))
        .route("/api/files/{id}/download", get(download_file))
        .route("/api/files/{id}", delete(delete_file))
        .with_state(file_service)
}
