//! Photo handlers, nested under `/api/users/{userId}/photos`.

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PHOTO_TAG;
use crate::api::dto::{ErrorResponse, PhotoResponse, PhotoUploadForm};
use crate::api::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::services::PhotoUpload;
use crate::state::AppState;

/// Routes (all authenticated):
/// - POST /
/// - GET /{id}
/// - DELETE /{id}
/// - POST /{id}/setMain
pub fn photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(upload_photo))
        .routes(routes!(get_photo, delete_photo))
        .routes(routes!(set_main_photo))
}

/// GET /api/users/{userId}/photos/{id}
#[utoipa::path(
    get,
    path = "/{id}",
    tag = PHOTO_TAG,
    params(
        ("userId" = i32, Path, description = "Member id"),
        ("id" = i32, Path, description = "Photo id")
    ),
    responses(
        (status = 200, description = "The photo", body = PhotoResponse),
        (status = 404, description = "No such photo", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_photo(
    State(state): State<AppState>,
    Path((_user_id, photo_id)): Path<(i32, i32)>,
) -> AppResult<Json<PhotoResponse>> {
    let photo = state.services.photos.get_photo(photo_id).await?;
    Ok(Json(photo.into()))
}

/// POST /api/users/{userId}/photos - Upload a photo
///
/// Multipart with a `file` part and an optional `description` part. The
/// member's first photo becomes the main photo.
#[utoipa::path(
    post,
    path = "/",
    tag = PHOTO_TAG,
    params(("userId" = i32, Path, description = "Must be the caller")),
    request_body(content = PhotoUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Photo stored", body = PhotoResponse),
        (status = 400, description = "Missing or empty file", body = ErrorResponse),
        (status = 401, description = "Not the caller", body = ErrorResponse),
        (status = 502, description = "Image host failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn upload_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<PhotoResponse>)> {
    auth_user.ensure_is(user_id)?;
    let upload = read_upload(multipart).await?;

    let photo = state.services.photos.upload(user_id, upload).await?;
    Ok((StatusCode::CREATED, Json(photo.into())))
}

/// POST /api/users/{userId}/photos/{id}/setMain
#[utoipa::path(
    post,
    path = "/{id}/setMain",
    tag = PHOTO_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("id" = i32, Path, description = "Photo id")
    ),
    responses(
        (status = 204, description = "Main photo changed"),
        (status = 400, description = "Already the main photo", body = ErrorResponse),
        (status = 401, description = "Not the caller's photo", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn set_main_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state.services.photos.set_main(user_id, photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/users/{userId}/photos/{id}
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PHOTO_TAG,
    params(
        ("userId" = i32, Path, description = "Must be the caller"),
        ("id" = i32, Path, description = "Photo id")
    ),
    responses(
        (status = 200, description = "Photo deleted"),
        (status = 400, description = "Main photo, or the image host refused", body = ErrorResponse),
        (status = 401, description = "Not the caller's photo", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((user_id, photo_id)): Path<(i32, i32)>,
) -> AppResult<StatusCode> {
    auth_user.ensure_is(user_id)?;
    state.services.photos.delete(user_id, photo_id).await?;
    Ok(StatusCode::OK)
}

async fn read_upload(mut multipart: Multipart) -> AppResult<PhotoUpload> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("photo").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("description") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::bad_request(format!("Failed to read description: {}", e)))?;
                description = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| AppError::Validation {
        field: "file".to_string(),
        reason: "A file part is required".to_string(),
    })?;

    Ok(PhotoUpload {
        file_name,
        bytes,
        description,
    })
}
