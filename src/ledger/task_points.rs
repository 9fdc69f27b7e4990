use rusqlite::Connection;

use crate::db::{points_repo, task_repo};
use crate::error::TaskupError;
use crate::models::{Task, TransactionMeta, TransactionType};

/// Per-assignee share of a point total. The same rounding is used for award,
/// deduction, and adjustment, so a deduct exactly mirrors its award. Rounding
/// drift relative to the undivided total (when `total % count != 0`) is
/// accepted, not corrected.
pub fn split_points(total: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }
    (total as f64 / count as f64).round() as i64
}

/// Outcome of a distribution pass over a task's assignees.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Distribution {
    pub per_assignee: i64,
    pub recipients: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl Distribution {
    fn empty(warning: Option<String>) -> Self {
        Self {
            per_assignee: 0,
            recipients: 0,
            warning,
        }
    }
}

/// Award a completed task's points: an even split per assignee, one
/// `task_completed` ledger row each. A task with no assignees awards nothing
/// and reports a warning instead of failing.
pub fn award(conn: &Connection, task: &Task, total_points: i64) -> Result<Distribution, TaskupError> {
    let assignees = task_repo::list_assignees(conn, &task.id)?;
    if assignees.is_empty() {
        return Ok(Distribution::empty(Some(format!(
            "task {} completed with no assignees; no points awarded",
            task.id
        ))));
    }

    let share = split_points(total_points, assignees.len());
    for user in &assignees {
        points_repo::record_transaction(
            conn,
            &user.id,
            &task.org_id,
            Some(&task.id),
            TransactionType::TaskCompleted,
            share,
            &TransactionMeta::TaskCompleted {
                task_title: task.title.clone(),
                goal_id: None,
            },
        )?;
    }

    Ok(Distribution {
        per_assignee: share,
        recipients: assignees.len() as i64,
        warning: None,
    })
}

/// Take back a previously awarded task: the mirror of [`award`] with the
/// per-assignee share negated, one `task_uncompleted` row each.
pub fn deduct(conn: &Connection, task: &Task, total_points: i64) -> Result<Distribution, TaskupError> {
    let assignees = task_repo::list_assignees(conn, &task.id)?;
    if assignees.is_empty() {
        return Ok(Distribution::empty(Some(format!(
            "task {} left done with no assignees; no points deducted",
            task.id
        ))));
    }

    let share = split_points(total_points, assignees.len());
    for user in &assignees {
        points_repo::record_transaction(
            conn,
            &user.id,
            &task.org_id,
            Some(&task.id),
            TransactionType::TaskUncompleted,
            -share,
            &TransactionMeta::TaskUncompleted {
                task_title: task.title.clone(),
                goal_id: None,
                reverts: None,
            },
        )?;
    }

    Ok(Distribution {
        per_assignee: -share,
        recipients: assignees.len() as i64,
        warning: None,
    })
}

/// Apply the signed per-assignee delta after a scoring property changed on a
/// done task. A delta that rounds to zero writes nothing.
pub fn adjust(
    conn: &Connection,
    task: &Task,
    old_score: i64,
    new_score: i64,
    property: &str,
    old_value: &str,
    new_value: &str,
) -> Result<Distribution, TaskupError> {
    let assignees = task_repo::list_assignees(conn, &task.id)?;
    if assignees.is_empty() {
        return Ok(Distribution::empty(None));
    }

    let delta = split_points(new_score, assignees.len()) - split_points(old_score, assignees.len());
    if delta == 0 {
        return Ok(Distribution::empty(None));
    }

    for user in &assignees {
        points_repo::record_transaction(
            conn,
            &user.id,
            &task.org_id,
            Some(&task.id),
            TransactionType::TaskPropertyChanged,
            delta,
            &TransactionMeta::PropertyChanged {
                task_title: task.title.clone(),
                property: property.to_string(),
                old_value: old_value.to_string(),
                new_value: new_value.to_string(),
            },
        )?;
    }

    Ok(Distribution {
        per_assignee: delta,
        recipients: assignees.len() as i64,
        warning: None,
    })
}

#[cfg(test)]
mod tests {
    use super::split_points;

    #[test]
    fn split_is_even_when_divisible() {
        assert_eq!(split_points(30, 3), 10);
        assert_eq!(split_points(0, 4), 0);
    }

    #[test]
    fn split_rounds_to_nearest() {
        assert_eq!(split_points(25, 2), 13);
        assert_eq!(split_points(10, 3), 3);
        assert_eq!(split_points(20, 3), 7);
    }

    #[test]
    fn split_with_zero_assignees_is_zero() {
        assert_eq!(split_points(100, 0), 0);
    }

    #[test]
    fn award_and_deduct_shares_mirror_exactly() {
        // Same rounding on both sides, so negation cancels per assignee.
        for total in [1, 7, 10, 25, 99, 100] {
            for count in 1..=5usize {
                let awarded = split_points(total, count);
                let deducted = -split_points(total, count);
                assert_eq!(awarded + deducted, 0);
            }
        }
    }
}
