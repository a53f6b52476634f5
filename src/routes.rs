use crate::common::state::AppState;
use crate::config::Config;
use crate::{actions, analyses, events, videos};
use axum::{Router, extract::DefaultBodyLimit};
use sea_orm::DatabaseConnection;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_scalar::{Scalar, Servable};

pub fn build_router(db: &DatabaseConnection, config: &Config) -> Router {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "Match Analysis API"),
        tags(
            (name = "events", description = "Competitions grouping videos and analyses"),
            (name = "videos", description = "Content-addressed match video uploads"),
            (name = "analyses", description = "Team scoring passes and their marks"),
            (name = "actions", description = "Global scoring rubric"),
            (name = "health", description = "Liveness and service information")
        )
    )]
    struct ApiDoc;

    let app_state = AppState::new(db.clone(), config.clone());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(crate::common::views::router(&app_state))
        .merge(events::views::router(&app_state))
        .merge(videos::views::router(&app_state))
        .merge(analyses::views::router(&app_state))
        .merge(actions::views::router(&app_state))
        .split_for_parts();

    router
        .merge(Scalar::with_url("/api/docs", api))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
