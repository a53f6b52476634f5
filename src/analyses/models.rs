use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub video_id: i32,
    pub team: String,
    #[sea_orm(column_name = "match")]
    pub match_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
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
    #[sea_orm(
        belongs_to = "crate::videos::models::Entity",
        from = "Column::VideoId",
        to = "crate::videos::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Video,
    #[sea_orm(has_many = "super::marks::models::Entity")]
    Marks,
}

impl Related<crate::events::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<crate::videos::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Video.def()
    }
}

impl Related<super::marks::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One scoring pass over one video for one team and match.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Analysis {
    pub id: i32,
    pub event_id: i32,
    pub video_id: i32,
    pub team: String,
    #[serde(rename = "match")]
    pub match_name: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Analysis {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            event_id: model.event_id,
            video_id: model.video_id,
            team: model.team,
            match_name: model.match_name,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Form fields accepted by `POST /videos/{id}/analyse`.
#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct AnalysisForm {
    #[serde(default)]
    pub team: String,
    #[serde(default, rename = "match")]
    pub match_name: String,
}

/// Analysis page payload. Marks and the rubric are independent read
/// models; the client joins them for display.
#[derive(ToSchema, Serialize, Debug)]
pub struct AnalysisDetail {
    pub analysis: Analysis,
    pub marks: Vec<super::marks::models::MarkView>,
    pub actions: Vec<crate::actions::models::Action>,
    pub total_points: i64,
}
