use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// Base value of one occurrence
    pub points: i32,
    pub ordering: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::analyses::marks::models::Entity")]
    Marks,
}

impl Related<crate::analyses::marks::models::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Rubric entry as shown to clients scoring an analysis.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Action {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub points: i32,
    pub ordering: i32,
}

impl From<Model> for Action {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            code: model.code,
            name: model.name,
            points: model.points,
            ordering: model.ordering,
        }
    }
}

#[derive(ToSchema, Deserialize, Debug, Clone)]
pub struct ActionCreate {
    pub code: String,
    pub name: String,
    pub points: i32,
    #[serde(default)]
    pub ordering: i32,
}
