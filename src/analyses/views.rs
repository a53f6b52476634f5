use super::marks::models::{SaveMarksRequest, SaveMarksResponse};
use super::marks::services::{list_marks, replace_marks, total_points};
use super::models::{ActiveModel, Analysis, AnalysisDetail, AnalysisForm, Entity, Model};
use crate::actions::catalog::ActionCatalog;
use crate::common::errors::BusinessResult;
use crate::common::state::AppState;
use crate::videos::models as videos;
use axum::{
    Form, Json,
    body::Bytes,
    extract::{Path, State},
    response::Redirect,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(create_analysis))
        .routes(routes!(get_analysis))
        .routes(routes!(save_marks))
        .with_state(state.clone())
}

async fn find_analysis(db: &DatabaseConnection, id: i32) -> BusinessResult<Model> {
    Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| crate::not_found!("Analysis", id))
}

#[utoipa::path(
    post,
    path = "/videos/{id}/analyse",
    params(("id" = i32, Path, description = "Video ID")),
    request_body(content = AnalysisForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = SEE_OTHER, description = "Analysis created, or form incomplete and sent back to the video"),
        (status = NOT_FOUND, description = "Video not found")
    ),
    tag = "analyses"
)]
pub async fn create_analysis(
    Path(video_id): Path<i32>,
    State(state): State<AppState>,
    Form(form): Form<AnalysisForm>,
) -> BusinessResult<Redirect> {
    let video = videos::Entity::find_by_id(video_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("Video", video_id))?;

    let team = form.team.trim();
    let match_name = form.match_name.trim();
    if team.is_empty() || match_name.is_empty() {
        return Ok(Redirect::to(&format!("/videos/{video_id}")));
    }

    let now = chrono::Utc::now();
    let analysis = ActiveModel {
        event_id: Set(video.event_id),
        video_id: Set(video.id),
        team: Set(team.to_string()),
        match_name: Set(match_name.to_string()),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        analysis_id = analysis.id,
        video_id = video.id,
        event_id = video.event_id,
        "Created analysis"
    );
    Ok(Redirect::to(&format!("/analyses/{}", analysis.id)))
}

#[utoipa::path(
    get,
    path = "/analyses/{id}",
    params(("id" = i32, Path, description = "Analysis ID")),
    responses(
        (status = OK, description = "Analysis with scored marks and the rubric", body = AnalysisDetail),
        (status = NOT_FOUND, description = "Analysis not found")
    ),
    tag = "analyses"
)]
pub async fn get_analysis(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<AnalysisDetail>> {
    let analysis = find_analysis(&state.db, id).await?;
    let marks = list_marks(&state.db, id).await?;
    let catalog = ActionCatalog::load(&state.db).await?;

    Ok(Json(AnalysisDetail {
        analysis: Analysis::from(analysis),
        total_points: total_points(&marks),
        marks,
        actions: catalog.actions().to_vec(),
    }))
}

/// Replace the full mark set of an analysis.
///
/// The body is parsed by hand so that malformed JSON gets the same error
/// shape as every other rejection.
#[utoipa::path(
    post,
    path = "/analyses/{id}/marks",
    params(("id" = i32, Path, description = "Analysis ID")),
    request_body = SaveMarksRequest,
    responses(
        (status = OK, description = "Marks replaced; stored set in time order", body = SaveMarksResponse),
        (status = BAD_REQUEST, description = "Invalid JSON, invalid mark or unknown action"),
        (status = NOT_FOUND, description = "Analysis not found")
    ),
    tag = "analyses"
)]
pub async fn save_marks(
    Path(id): Path<i32>,
    State(state): State<AppState>,
    body: Bytes,
) -> BusinessResult<Json<SaveMarksResponse>> {
    find_analysis(&state.db, id).await?;

    let request: SaveMarksRequest = serde_json::from_slice(&body).map_err(|err| {
        tracing::debug!(analysis_id = id, %err, "Rejected mark payload");
        crate::validation_error!("body", "Invalid JSON")
    })?;

    let catalog = ActionCatalog::load(&state.db).await?;
    let marks = replace_marks(&state.db, id, request.marks, &catalog).await?;

    Ok(Json(SaveMarksResponse {
        success: true,
        marks,
    }))
}
