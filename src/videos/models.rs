use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "videos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    /// Display name supplied by the uploader
    pub filename: String,
    /// Location below the video root, derived from the content hash
    pub file_path: String,
    pub duration_seconds: Option<Decimal>,
    pub file_size_bytes: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::events::models::Entity",
        from = "Column::EventId",
        to = "crate::events::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(has_many = "crate::analyses::models::Entity")]
    Analyses,
}

impl Related<crate::events::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<crate::analyses::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Video {
    pub id: i32,
    pub event_id: i32,
    pub filename: String,
    pub file_path: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub duration_seconds: Option<Decimal>,
    pub file_size_bytes: Option<i64>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Model> for Video {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            filename: model.filename,
            file_path: model.file_path,
            duration_seconds: model.duration_seconds,
            file_size_bytes: model.file_size_bytes,
            uploaded_at: model.uploaded_at,
        }
    }
}

/// Video page payload: the video with every analysis made of it.
#[derive(ToSchema, Serialize, Debug)]
pub struct VideoDetail {
    pub video: Video,
    pub event: crate::events::models::Event,
    pub analyses: Vec<crate::analyses::models::Analysis>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    pub success: bool,
    pub video_id: i32,
    pub redirect_url: String,
}
