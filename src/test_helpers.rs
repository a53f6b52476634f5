//! Shared builders for tests across the crate.
//!
//! Rows are inserted straight through the entities so that tests of one
//! endpoint do not depend on the behaviour of another.
use crate::{actions, analyses, events, videos};
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use serde_json::{Value, json};

/// Extract response body as JSON for testing
pub async fn extract_response_body(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let body: Value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| json!({"error": "Invalid JSON response"}));
    (status, body)
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub async fn create_test_event(
    db: &DatabaseConnection,
    name: &str,
    date: NaiveDate,
) -> events::models::Model {
    let now = Utc::now();
    events::models::ActiveModel {
        name: Set(name.to_string()),
        date: Set(date),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test event")
}

pub async fn create_test_action(
    db: &DatabaseConnection,
    code: &str,
    points: i32,
    ordering: i32,
) -> actions::models::Model {
    let now = Utc::now();
    actions::models::ActiveModel {
        code: Set(code.to_string()),
        name: Set(format!("{code} action")),
        points: Set(points),
        ordering: Set(ordering),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test action")
}

/// Video row pointing at `file_path`; nothing is written to disk.
pub async fn create_test_video(
    db: &DatabaseConnection,
    event_id: i32,
    filename: &str,
    file_path: &str,
) -> videos::models::Model {
    let now = Utc::now();
    videos::models::ActiveModel {
        event_id: Set(event_id),
        filename: Set(filename.to_string()),
        file_path: Set(file_path.to_string()),
        duration_seconds: Set(None),
        file_size_bytes: Set(None),
        uploaded_at: Set(now),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test video")
}

pub async fn create_test_analysis(
    db: &DatabaseConnection,
    video: &videos::models::Model,
    team: &str,
    match_name: &str,
) -> analyses::models::Model {
    let now = Utc::now();
    analyses::models::ActiveModel {
        event_id: Set(video.event_id),
        video_id: Set(video.id),
        team: Set(team.to_string()),
        match_name: Set(match_name.to_string()),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create test analysis")
}

/// Event, video and analysis chained together, the usual starting point
/// for mark tests.
pub async fn create_test_analysis_tree(db: &DatabaseConnection) -> analyses::models::Model {
    let event = create_test_event(db, "Regional Finals", date(2024, 6, 1)).await;
    let video = create_test_video(db, event.id, "court-1.mp4", "2024/06/01/abc.mp4").await;
    create_test_analysis(db, &video, "Team Red", "Semi 1").await
}
