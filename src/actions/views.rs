use super::catalog::ActionCatalog;
use super::models::{Action, ActionCreate, ActiveModel, Entity};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_actions, create_action))
        .routes(routes!(get_action))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/actions",
    responses(
        (status = OK, description = "Rubric in display order", body = Vec<Action>)
    ),
    tag = "actions"
)]
pub async fn list_actions(State(state): State<AppState>) -> BusinessResult<Json<Vec<Action>>> {
    let catalog = ActionCatalog::load(&state.db).await?;
    Ok(Json(catalog.actions().to_vec()))
}

#[utoipa::path(
    get,
    path = "/actions/{id}",
    params(("id" = i32, Path, description = "Action ID")),
    responses(
        (status = OK, description = "Rubric entry", body = Action),
        (status = NOT_FOUND, description = "Action not found")
    ),
    tag = "actions"
)]
pub async fn get_action(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<Action>> {
    let action = Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| crate::not_found!("Action", id))?;
    Ok(Json(action.into()))
}

#[utoipa::path(
    post,
    path = "/actions",
    request_body = ActionCreate,
    responses(
        (status = CREATED, description = "Rubric entry created", body = Action),
        (status = BAD_REQUEST, description = "Blank code or name"),
        (status = CONFLICT, description = "Code already in use")
    ),
    tag = "actions"
)]
pub async fn create_action(
    State(state): State<AppState>,
    Json(data): Json<ActionCreate>,
) -> BusinessResult<(StatusCode, Json<Action>)> {
    let code = data.code.trim().to_string();
    let name = data.name.trim().to_string();
    if code.is_empty() {
        return Err(crate::validation_error!("code", "Action code is required"));
    }
    if name.is_empty() {
        return Err(crate::validation_error!("name", "Action name is required"));
    }

    let now = chrono::Utc::now();
    let action = ActiveModel {
        code: Set(code),
        name: Set(name),
        points: Set(data.points),
        ordering: Set(data.ordering),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await
    .map_err(|err| err.to_business_error("action"))?;

    tracing::info!(action_id = action.id, code = %action.code, "Created action");
    Ok((StatusCode::CREATED, Json(action.into())))
}
