//! Media upload and late-attachment handlers.

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use atrium_core::domain::{Media, storage_filename, validate_upload};
use atrium_core::error::RepoError;
use atrium_core::ports::{BaseRepository, BlobStorage, MediaRepository};
use atrium_shared::dto::{AttachMediaRequest, MediaMutationBody, UploadBody, UploadedFileBody};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart payload for POST /api/upload.
#[derive(Debug, MultipartForm)]
pub struct UploadForm {
    #[multipart(limit = "60MiB")]
    pub file: TempFile,
    #[multipart(rename = "postId")]
    pub post_id: Option<Text<String>>,
}

/// POST /api/upload - store the bytes, record the media row, return the
/// locator. Without a `postId` the row stays unattached until a later
/// PATCH /api/media/{id}.
pub async fn upload(
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> AppResult<HttpResponse> {
    let mime = form
        .file
        .content_type
        .as_ref()
        .map(|m| m.essence_str().to_owned())
        .ok_or_else(|| AppError::UnsupportedMedia("missing content type".to_string()))?;

    // Policy check runs before anything touches storage.
    validate_upload(&mime, form.file.size)?;

    let post_id = form
        .post_id
        .as_ref()
        .map(|text| Uuid::parse_str(text))
        .transpose()
        .map_err(|_| AppError::BadRequest("postId is not a valid id".to_string()))?;

    let original_name = form
        .file
        .file_name
        .clone()
        .unwrap_or_else(|| "upload".to_string());
    let filename = storage_filename(&original_name, &mime);

    tracing::debug!(
        original = %original_name,
        stored = %filename,
        mime = %mime,
        size = form.file.size,
        "Handling upload"
    );

    let temp_path = form.file.file.path().to_path_buf();
    let bytes = web::block(move || std::fs::read(temp_path))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let url = state.storage.put(&filename, &bytes).await?;

    let media = state
        .media
        .insert(Media::new(&mime, &url, &filename, &original_name, post_id))
        .await?;

    Ok(HttpResponse::Ok().json(UploadBody {
        success: true,
        file: UploadedFileBody {
            id: media.id,
            filename: media.filename,
            url: media.url,
            media_type: media.media_type,
        },
    }))
}

/// PATCH /api/media/{id} - point an uploaded row at a post. Idempotent
/// for the same post; last-write-wins for a different one.
pub async fn attach(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AttachMediaRequest>,
) -> AppResult<HttpResponse> {
    let media_id = path.into_inner();
    let post_id = body.into_inner().post_id;

    // The owning post must exist before media can point at it.
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;

    let media = state
        .media
        .attach(media_id, post_id)
        .await
        .map_err(|e| match e {
            RepoError::NotFound => AppError::NotFound(format!("media {} not found", media_id)),
            other => other.into(),
        })?;

    Ok(HttpResponse::Ok().json(MediaMutationBody {
        success: true,
        media: media.into(),
    }))
}
