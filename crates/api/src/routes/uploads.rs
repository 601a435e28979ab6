//! Image upload routes for the admin forms.

use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State, multipart::MultipartError, rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::AppState;
use shanti_core::storage::{StoredObject, StoredReference, UploadRequest};
use shanti_shared::AppError;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

/// Creates the upload routes.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/uploads",
            post(upload_image).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/uploads", get(list_files).delete(delete_image))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for an upload.
#[derive(Debug, Serialize)]
pub struct UploadResult {
    /// Whether a reference was produced.
    pub success: bool,
    /// Reference URL (public URL or data URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Where the image ended up: `remote` or `inline`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<&'static str>,
    /// Error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    fn stored(reference: &StoredReference) -> Self {
        Self {
            success: true,
            url: Some(reference.url().to_string()),
            storage: Some(reference.kind()),
            error: None,
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            storage: None,
            error: Some(error.into()),
        }
    }
}

/// Request body for deleting an image.
#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    /// Stored reference URL.
    #[serde(default)]
    pub url: String,
}

/// Response for a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResult {
    /// False only when the remote delete failed.
    pub success: bool,
    /// Error message of a failed remote delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response for a listing.
#[derive(Debug, Serialize)]
pub struct ListResult {
    /// Whether the listing succeeded.
    pub success: bool,
    /// Listed files.
    pub files: Vec<StoredObject>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Render an application error as a JSON failure envelope.
fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "success": false,
            "error": err.to_string(),
            "code": err.error_code()
        })),
    )
        .into_response()
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}

/// Read the `file` field into an upload request. Empty files count as missing.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadRequest>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadRequest::new(file_name, content_type, bytes)));
    }

    Ok(None)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/uploads`
/// Upload an image; always answers with a remote or inline reference.
async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let request = match read_file_field(&mut multipart).await {
        Ok(Some(request)) => request,
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(UploadResult::failure("No file provided")),
            )
                .into_response();
        }
        Err(e) => return error_response(&e),
    };

    info!(
        file_name = %request.file_name,
        size = request.len(),
        content_type = %request.media_type(),
        "Image upload requested"
    );

    let reference = state.uploads.upload_image(&request).await;

    (StatusCode::OK, Json(UploadResult::stored(&reference))).into_response()
}

/// DELETE `/uploads`
/// Best-effort delete of a stored image.
async fn delete_image(
    State(state): State<AppState>,
    payload: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(&AppError::Validation(rejection.body_text()));
        }
    };

    let outcome = state.uploads.delete_image(&payload.url).await;

    Json(DeleteResult {
        success: outcome.is_success(),
        error: outcome.error().map(str::to_owned),
    })
    .into_response()
}

/// GET `/uploads`
/// List the images stored remotely.
async fn list_files(State(state): State<AppState>) -> Response {
    match state.uploads.list_files().await {
        Ok(files) => Json(ListResult {
            success: true,
            files,
        })
        .into_response(),
        Err(e) => error_response(&AppError::from(e)),
    }
}
