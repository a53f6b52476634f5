use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "marks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub analysis_id: i32,
    pub action_id: i32,
    /// Position in the video, 4 decimal places
    pub time_seconds: Decimal,
    /// Gap to the previous mark of the same analysis
    pub delta_seconds: Decimal,
    pub is_failure: bool,
    pub count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::analyses::models::Entity",
        from = "Column::AnalysisId",
        to = "crate::analyses::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Analysis,
    #[sea_orm(
        belongs_to = "crate::actions::models::Entity",
        from = "Column::ActionId",
        to = "crate::actions::models::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Action,
}

impl Related<crate::analyses::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analysis.def()
    }
}

impl Related<crate::actions::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Action.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// One mark as submitted by the scoring client.
#[derive(ToSchema, Deserialize, Debug, Clone, PartialEq)]
pub struct MarkInput {
    pub action_id: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub time_seconds: Decimal,
    pub is_failure: Option<bool>,
    pub count: Option<i32>,
}

/// Body of `POST /analyses/{id}/marks`. The list replaces every mark the
/// analysis currently has.
#[derive(ToSchema, Deserialize, Debug, Default)]
pub struct SaveMarksRequest {
    #[serde(default)]
    pub marks: Vec<MarkInput>,
}

/// Persisted mark joined with its action, scored at read time.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MarkView {
    pub id: i32,
    pub action_id: i32,
    pub action_code: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub time_seconds: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub delta_seconds: Decimal,
    pub is_failure: bool,
    pub count: i32,
    pub points: i64,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SaveMarksResponse {
    pub success: bool,
    pub marks: Vec<MarkView>,
}
