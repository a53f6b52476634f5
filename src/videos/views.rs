use super::ingest::prepare_upload;
use super::models::{ActiveModel, Entity, UploadResponse, Video, VideoDetail};
use crate::analyses::models as analyses;
use crate::common::errors::BusinessResult;
use crate::common::state::AppState;
use crate::events::models::get_event;
use axum::{
    Json,
    body::{Body, Bytes},
    extract::{Multipart, Path, State},
    http::header::{CONTENT_LENGTH, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait, ModelTrait, QueryOrder};
use tokio_util::io::ReaderStream;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Served when the stored extension does not map to a known type.
const DEFAULT_VIDEO_MIME: &str = "video/mp4";

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(upload_video))
        .routes(routes!(get_video))
        .routes(routes!(serve_video))
        .with_state(state.clone())
}

#[utoipa::path(
    post,
    path = "/events/{id}/upload",
    params(("id" = i32, Path, description = "Event ID")),
    request_body(
        content_type = "multipart/form-data",
        description = "`video` file part and `filename` text part",
        example = json!({
            "video": "(binary data)",
            "filename": "Court 2 - semi final.mp4"
        })
    ),
    responses(
        (status = OK, description = "Video stored", body = UploadResponse),
        (status = BAD_REQUEST, description = "Missing part or content is not a supported video"),
        (status = NOT_FOUND, description = "Event not found")
    ),
    tag = "videos"
)]
pub async fn upload_video(
    Path(event_id): Path<i32>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> BusinessResult<Json<UploadResponse>> {
    let event = get_event(&state.db, event_id)
        .await?
        .ok_or_else(|| crate::not_found!("Event", event_id))?;

    let mut content: Option<Bytes> = None;
    let mut filename = String::new();

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        tracing::debug!(event_id, %err, "Unreadable upload body");
        crate::validation_error!("body", "Invalid form data")
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            // Only a file part counts as the upload
            "video" if field.file_name().is_some() => {
                content = Some(field.bytes().await.map_err(|err| {
                    tracing::debug!(event_id, %err, "Video part could not be read");
                    crate::validation_error!("video", "Invalid form data")
                })?);
            }
            "filename" => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| crate::validation_error!("filename", "Invalid form data"))?;
                filename = text.trim().to_string();
            }
            _ => {}
        }
    }

    let Some(content) = content else {
        return Err(crate::validation_error!("video", "No video file provided"));
    };
    if filename.is_empty() {
        return Err(crate::validation_error!("filename", "No filename provided"));
    }

    let Some(prepared) = prepare_upload(&content, event.date) else {
        tracing::info!(event_id, size = content.len(), "Rejected upload with unknown format");
        return Err(crate::validation_error!("video", "Invalid video file format"));
    };

    state
        .storage
        .store(&prepared.relative_path, &content)
        .await?;

    let now = chrono::Utc::now();
    let video = ActiveModel {
        event_id: Set(event.id),
        filename: Set(filename),
        file_path: Set(prepared.relative_path),
        duration_seconds: Set(None),
        file_size_bytes: Set(i64::try_from(content.len()).ok()),
        uploaded_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        video_id = video.id,
        event_id = event.id,
        container = %prepared.container,
        hash = %prepared.hash,
        size = content.len(),
        "Stored video upload"
    );

    Ok(Json(UploadResponse {
        success: true,
        video_id: video.id,
        redirect_url: format!("/events/{}", event.id),
    }))
}

#[utoipa::path(
    get,
    path = "/videos/{id}",
    params(("id" = i32, Path, description = "Video ID")),
    responses(
        (status = OK, description = "Video with its event and analyses", body = VideoDetail),
        (status = NOT_FOUND, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn get_video(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<VideoDetail>> {
    let video = Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("Video", id))?;

    let event = get_event(&state.db, video.event_id)
        .await?
        .ok_or_else(|| crate::not_found!("Event", video.event_id))?;

    let video_analyses = video
        .find_related(analyses::Entity)
        .order_by_asc(analyses::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(VideoDetail {
        video: Video::from(video),
        event: event.into(),
        analyses: video_analyses.into_iter().map(Into::into).collect(),
    }))
}

/// Stream the stored file. A row whose file has gone missing is a server
/// fault, not a client one.
#[utoipa::path(
    get,
    path = "/videos/{id}/file",
    params(("id" = i32, Path, description = "Video ID")),
    responses(
        (status = OK, description = "Raw video bytes"),
        (status = NOT_FOUND, description = "Video not found"),
        (status = INTERNAL_SERVER_ERROR, description = "Stored file unreadable")
    ),
    tag = "videos"
)]
pub async fn serve_video(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Response> {
    let video = Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("Video", id))?;

    let file = state.storage.open(&video.file_path).await.map_err(|err| {
        tracing::error!(video_id = id, path = %video.file_path, %err, "Stored video unreadable");
        err
    })?;
    let length = file.metadata().await?.len();

    let content_type = mime_guess::from_path(&video.file_path)
        .first_raw()
        .unwrap_or(DEFAULT_VIDEO_MIME);

    Ok((
        [
            (CONTENT_TYPE, content_type.to_string()),
            (CONTENT_LENGTH, length.to_string()),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
