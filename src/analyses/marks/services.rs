//! Mark scoring and the save/replace protocol.
//!
//! A save carries the complete mark list of an analysis. The list is
//! validated and ordered in memory first; only a fully valid batch reaches
//! the database, where it replaces the previous set inside one transaction.

use super::models::{ActiveModel, Column, Entity, MarkInput, MarkView};
use crate::actions::catalog::ActionCatalog;
use crate::actions::models as actions;
use crate::common::errors::BusinessResult;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};

/// Decimal places kept for mark times and deltas.
pub const TIME_SCALE: u32 = 4;

/// Exclusive upper bound on mark times: the column holds `decimal(10, 4)`.
pub const TIME_LIMIT_SECONDS: i64 = 1_000_000;

/// A validated mark in final order, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMark {
    pub action_id: i32,
    pub time_seconds: Decimal,
    pub delta_seconds: Decimal,
    pub is_failure: bool,
    pub count: i32,
}

/// Score of a single mark. Failed attempts are worth nothing.
pub fn points(action_points: i32, is_failure: bool, count: i32) -> i64 {
    if is_failure {
        0
    } else {
        i64::from(action_points) * i64::from(count)
    }
}

pub fn total_points(marks: &[MarkView]) -> i64 {
    marks
        .iter()
        .fold(0i64, |total, mark| total.saturating_add(mark.points))
}

/// Validate, normalise and order a submitted mark list.
///
/// Every mark is checked before anything else happens, so a single bad
/// entry rejects the whole batch. Sorting is stable: marks sharing a time
/// keep their submission order.
pub fn plan_marks(
    inputs: Vec<MarkInput>,
    catalog: &ActionCatalog,
) -> BusinessResult<Vec<PlannedMark>> {
    let time_limit = Decimal::from(TIME_LIMIT_SECONDS);
    let mut planned = Vec::with_capacity(inputs.len());
    for input in inputs {
        let count = input.count.unwrap_or(1);
        if count < 1 {
            return Err(crate::validation_error!("count", "Count must be at least 1"));
        }
        if input.time_seconds < Decimal::ZERO {
            return Err(crate::validation_error!(
                "time_seconds",
                "Time must not be negative"
            ));
        }
        let time_seconds = input.time_seconds.round_dp(TIME_SCALE);
        if time_seconds >= time_limit {
            return Err(crate::validation_error!(
                "time_seconds",
                format!("Time must be below {TIME_LIMIT_SECONDS} seconds")
            ));
        }
        planned.push(PlannedMark {
            action_id: input.action_id,
            time_seconds,
            delta_seconds: Decimal::ZERO,
            is_failure: input.is_failure.unwrap_or(false),
            count,
        });
    }

    let unknown = catalog.unknown_ids(planned.iter().map(|mark| mark.action_id));
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "Rejected marks referencing unknown actions");
        return Err(crate::validation_error!("action_id", "Invalid action ID"));
    }

    planned.sort_by(|a, b| a.time_seconds.cmp(&b.time_seconds));

    let mut previous = Decimal::ZERO;
    for mark in &mut planned {
        mark.delta_seconds = mark.time_seconds - previous;
        previous = mark.time_seconds;
    }

    Ok(planned)
}

/// Replace every mark of `analysis_id` with `inputs` and return the stored
/// set as clients see it.
///
/// The caller has already confirmed the analysis exists. Nothing is written
/// unless the whole batch validates.
pub async fn replace_marks(
    db: &DatabaseConnection,
    analysis_id: i32,
    inputs: Vec<MarkInput>,
    catalog: &ActionCatalog,
) -> BusinessResult<Vec<MarkView>> {
    let planned = plan_marks(inputs, catalog)?;
    let submitted = planned.len();

    let now = chrono::Utc::now();
    let rows: Vec<ActiveModel> = planned
        .into_iter()
        .map(|mark| ActiveModel {
            analysis_id: Set(analysis_id),
            action_id: Set(mark.action_id),
            time_seconds: Set(mark.time_seconds),
            delta_seconds: Set(mark.delta_seconds),
            is_failure: Set(mark.is_failure),
            count: Set(mark.count),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .collect();

    let txn = db.begin().await?;

    let removed = Entity::delete_many()
        .filter(Column::AnalysisId.eq(analysis_id))
        .exec(&txn)
        .await?
        .rows_affected;

    if !rows.is_empty() {
        Entity::insert_many(rows).exec(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(analysis_id, removed, submitted, "Replaced analysis marks");

    Ok(list_marks(db, analysis_id).await?)
}

/// Marks of an analysis joined with their actions, ordered by time with
/// insertion order breaking ties.
pub async fn list_marks<C: ConnectionTrait>(
    db: &C,
    analysis_id: i32,
) -> Result<Vec<MarkView>, DbErr> {
    let rows = Entity::find()
        .filter(Column::AnalysisId.eq(analysis_id))
        .find_also_related(actions::Entity)
        .order_by_asc(Column::TimeSeconds)
        .order_by_asc(Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(mark, action)| {
            let Some(action) = action else {
                tracing::warn!(mark_id = mark.id, "Mark without action skipped");
                return None;
            };
            Some(MarkView {
                id: mark.id,
                action_id: mark.action_id,
                action_code: action.code,
                time_seconds: mark.time_seconds.round_dp(TIME_SCALE),
                delta_seconds: mark.delta_seconds.round_dp(TIME_SCALE),
                is_failure: mark.is_failure,
                count: mark.count,
                points: points(action.points, mark.is_failure, mark.count),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::models::Action;
    use crate::common::errors::BusinessError;
    use rstest::rstest;
    use std::str::FromStr;

    fn catalog() -> ActionCatalog {
        ActionCatalog::from_actions(vec![
            Action {
                id: 1,
                code: "A".to_string(),
                name: "Attack".to_string(),
                points: 3,
                ordering: 0,
            },
            Action {
                id: 2,
                code: "B".to_string(),
                name: "Block".to_string(),
                points: 5,
                ordering: 1,
            },
        ])
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    fn input(action_id: i32, time: &str) -> MarkInput {
        MarkInput {
            action_id,
            time_seconds: dec(time),
            is_failure: None,
            count: None,
        }
    }

    #[rstest]
    #[case::success(3, false, 1, 3)]
    #[case::multiplied(5, false, 2, 10)]
    #[case::failure_scores_nothing(5, true, 4, 0)]
    #[case::negative_action(-2, false, 3, -6)]
    #[case::large(i32::MAX, false, i32::MAX, i64::from(i32::MAX) * i64::from(i32::MAX))]
    fn test_points(
        #[case] action_points: i32,
        #[case] is_failure: bool,
        #[case] count: i32,
        #[case] expected: i64,
    ) {
        assert_eq!(points(action_points, is_failure, count), expected);
    }

    #[test]
    fn test_plan_sorts_and_computes_deltas() {
        let planned = plan_marks(
            vec![
                MarkInput {
                    count: Some(2),
                    ..input(2, "12.5")
                },
                input(1, "3.0"),
            ],
            &catalog(),
        )
        .unwrap();

        assert_eq!(planned.len(), 2);
        assert_eq!(planned[0].action_id, 1);
        assert_eq!(planned[0].time_seconds, dec("3.0"));
        assert_eq!(planned[0].delta_seconds, dec("3.0"));
        assert_eq!(planned[1].action_id, 2);
        assert_eq!(planned[1].delta_seconds, dec("9.5"));
        assert_eq!(planned[1].count, 2);
        assert!(!planned[1].is_failure);
    }

    #[test]
    fn test_plan_keeps_submission_order_for_equal_times() {
        let planned = plan_marks(
            vec![input(2, "5"), input(1, "5"), input(2, "1")],
            &catalog(),
        )
        .unwrap();

        let order: Vec<i32> = planned.iter().map(|m| m.action_id).collect();
        assert_eq!(order, vec![2, 2, 1]);
        assert_eq!(planned[1].time_seconds, dec("5"));
        assert_eq!(planned[2].delta_seconds, Decimal::ZERO);
    }

    #[test]
    fn test_plan_rounds_to_four_places() {
        let planned = plan_marks(vec![input(1, "1.234567")], &catalog()).unwrap();
        assert_eq!(planned[0].time_seconds, dec("1.2346"));
        assert_eq!(planned[0].delta_seconds, dec("1.2346"));
    }

    #[test]
    fn test_plan_accepts_largest_storable_time() {
        let planned = plan_marks(vec![input(1, "999999.9999")], &catalog()).unwrap();
        assert_eq!(planned[0].time_seconds, dec("999999.9999"));
    }

    #[test]
    fn test_plan_empty_list() {
        assert!(plan_marks(vec![], &catalog()).unwrap().is_empty());
    }

    #[test]
    fn test_plan_rejects_unknown_action() {
        let err = plan_marks(vec![input(1, "1"), input(99, "2")], &catalog()).unwrap_err();
        match err {
            BusinessError::ValidationError { message, .. } => {
                assert_eq!(message, "Invalid action ID");
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case::zero_count(Some(0), "1")]
    #[case::negative_count(Some(-3), "1")]
    #[case::negative_time(None, "-0.5")]
    #[case::time_too_large(None, "1000000")]
    #[case::rounds_up_to_limit(None, "999999.99996")]
    fn test_plan_rejects_invalid_mark(#[case] count: Option<i32>, #[case] time: &str) {
        let mark = MarkInput {
            count,
            ..input(1, time)
        };
        assert!(matches!(
            plan_marks(vec![mark], &catalog()),
            Err(BusinessError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_total_points() {
        let view = |points| MarkView {
            id: 1,
            action_id: 1,
            action_code: "A".to_string(),
            time_seconds: Decimal::ZERO,
            delta_seconds: Decimal::ZERO,
            is_failure: false,
            count: 1,
            points,
        };
        assert_eq!(total_points(&[view(3), view(10), view(0)]), 13);
        assert_eq!(total_points(&[]), 0);
        assert_eq!(total_points(&[view(i64::MAX), view(1)]), i64::MAX);
    }
}
