//! Read-only snapshot of the scoring rubric.
//!
//! The rubric is global and shared by every event. Handlers load one
//! snapshot per request and hand it to whatever needs to resolve action
//! ids; nothing mutates it while a request is in flight.

use super::models::{Action, Column, Entity};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, QueryOrder};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: Vec<Action>,
    ids: HashSet<i32>,
}

impl ActionCatalog {
    /// Load every action in display order.
    pub async fn load<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let actions = Entity::find()
            .order_by_asc(Column::Ordering)
            .order_by_asc(Column::Id)
            .all(db)
            .await?
            .into_iter()
            .map(Action::from)
            .collect();
        Ok(Self::from_actions(actions))
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        let ids = actions.iter().map(|action| action.id).collect();
        Self { actions, ids }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }

    /// Ids from `ids` that do not resolve, ascending and deduplicated.
    pub fn unknown_ids<I>(&self, ids: I) -> Vec<i32>
    where
        I: IntoIterator<Item = i32>,
    {
        ids.into_iter()
            .filter(|id| !self.contains(*id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Actions in display order.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }
}
