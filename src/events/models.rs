use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::videos::models::Entity")]
    Videos,
    #[sea_orm(has_many = "crate::analyses::models::Entity")]
    Analyses,
}

impl Related<crate::videos::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videos.def()
    }
}

impl Related<crate::analyses::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A tournament or competition day grouping videos and analyses.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for Event {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            date: model.date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Form fields accepted by `POST /events/new`.
#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct EventForm {
    pub name: Option<String>,
    /// Calendar date as `YYYY-MM-DD`
    pub date: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct FormField {
    pub name: &'static str,
    pub input_type: &'static str,
    pub required: bool,
}

/// Describes the event creation form for clients rendering it.
#[derive(ToSchema, Serialize, Debug)]
pub struct EventFormDescriptor {
    pub action: &'static str,
    pub method: &'static str,
    pub fields: Vec<FormField>,
}

impl Default for EventFormDescriptor {
    fn default() -> Self {
        Self {
            action: "/events/new",
            method: "POST",
            fields: vec![
                FormField {
                    name: "name",
                    input_type: "text",
                    required: true,
                },
                FormField {
                    name: "date",
                    input_type: "date",
                    required: true,
                },
            ],
        }
    }
}

/// Event page payload: the event, its analyses, and its videos split by
/// whether any analysis references them yet.
#[derive(ToSchema, Serialize, Debug)]
pub struct EventDetail {
    pub event: Event,
    pub analyses: Vec<crate::analyses::models::Analysis>,
    pub linked_videos: Vec<crate::videos::models::Video>,
    pub unlinked_videos: Vec<crate::videos::models::Video>,
}

pub async fn get_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id).one(db).await
}

/// Splits an event's videos into those referenced by at least one analysis
/// and those still awaiting analysis. Input order is preserved in both.
pub fn partition_videos(
    videos: Vec<crate::videos::models::Model>,
    analyses: &[crate::analyses::models::Model],
) -> (
    Vec<crate::videos::models::Model>,
    Vec<crate::videos::models::Model>,
) {
    let linked_ids: HashSet<i32> = analyses.iter().map(|analysis| analysis.video_id).collect();
    videos
        .into_iter()
        .partition(|video| linked_ids.contains(&video.id))
}
