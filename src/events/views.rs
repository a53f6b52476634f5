use super::models::{
    ActiveModel, Column, Entity, Event, EventDetail, EventForm, EventFormDescriptor, get_event,
    partition_videos,
};
use crate::analyses::models as analyses;
use crate::common::errors::BusinessResult;
use crate::common::state::AppState;
use crate::videos::models as videos;
use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder,
};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_events))
        .routes(routes!(event_form, create_event))
        .routes(routes!(get_event_detail, delete_event))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "All events, newest first", body = Vec<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(State(state): State<AppState>) -> BusinessResult<Json<Vec<Event>>> {
    let events = Entity::find()
        .order_by_desc(Column::Date)
        .order_by_desc(Column::Id)
        .all(&state.db)
        .await?;
    Ok(Json(events.into_iter().map(Event::from).collect()))
}

#[utoipa::path(
    get,
    path = "/events/new",
    responses(
        (status = OK, description = "Fields expected by the event creation form", body = EventFormDescriptor)
    ),
    tag = "events"
)]
pub async fn event_form() -> Json<EventFormDescriptor> {
    Json(EventFormDescriptor::default())
}

#[utoipa::path(
    post,
    path = "/events/new",
    request_body(content = EventForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = SEE_OTHER, description = "Event created, redirect to the event list"),
        (status = BAD_REQUEST, description = "Name or date missing or malformed")
    ),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    Form(form): Form<EventForm>,
) -> BusinessResult<Redirect> {
    let name = form.name.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(crate::validation_error!("name", "Event name is required"));
    }
    let raw_date = form.date.as_deref().map(str::trim).unwrap_or_default();
    if raw_date.is_empty() {
        return Err(crate::validation_error!("date", "Event date is required"));
    }
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| crate::validation_error!("date", "Event date must be YYYY-MM-DD"))?;

    let now = chrono::Utc::now();
    let event = ActiveModel {
        name: Set(name.to_string()),
        date: Set(date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(event_id = event.id, %date, "Created event");
    Ok(Redirect::to("/"))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = OK, description = "Event with its analyses and videos", body = EventDetail),
        (status = NOT_FOUND, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event_detail(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<Json<EventDetail>> {
    let event = get_event(&state.db, id)
        .await?
        .ok_or_else(|| crate::not_found!("Event", id))?;

    let event_analyses = event
        .find_related(analyses::Entity)
        .order_by_desc(analyses::Column::MatchName)
        .order_by_asc(analyses::Column::Id)
        .all(&state.db)
        .await?;
    let event_videos = videos::Entity::find()
        .filter(videos::Column::EventId.eq(id))
        .order_by_asc(videos::Column::Id)
        .all(&state.db)
        .await?;

    let (linked, unlinked) = partition_videos(event_videos, &event_analyses);

    Ok(Json(EventDetail {
        event: event.into(),
        analyses: event_analyses.into_iter().map(Into::into).collect(),
        linked_videos: linked.into_iter().map(Into::into).collect(),
        unlinked_videos: unlinked.into_iter().map(Into::into).collect(),
    }))
}

/// Delete an event with its videos, analyses and marks. Stored files stay
/// on disk since other uploads may share them.
#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = NO_CONTENT, description = "Event deleted"),
        (status = NOT_FOUND, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn delete_event(
    Path(id): Path<i32>,
    State(state): State<AppState>,
) -> BusinessResult<StatusCode> {
    let result = Entity::delete_by_id(id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(crate::not_found!("Event", id));
    }

    tracing::info!(event_id = id, "Deleted event");
    Ok(StatusCode::NO_CONTENT)
}
