use std::collections::{HashMap, HashSet};

use rusqlite::Connection;

use crate::db::{goal_repo, points_repo, task_repo};
use crate::error::TaskupError;
use crate::models::{Goal, GoalStatus, TaskStatus, TransactionMeta, TransactionType};

#[derive(Debug, Clone, serde::Serialize)]
pub struct GoalCompletion {
    pub points_distributed: i64,
    pub recipients: Vec<Recipient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Recipient {
    pub handle: String,
    pub points: i64,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct GoalReversal {
    pub transactions_reverted: i64,
    pub points_reclaimed: i64,
}

/// Complete a goal and distribute its point reward.
///
/// Every linked task must be done and the goal must have at least one
/// assignee. The reward is split evenly across linked tasks; each task's
/// share is then split evenly (rounded) among the assignees it shares with
/// the goal. Users accrue across tasks and receive a single `task_completed`
/// ledger row tagged with the goal id — the tag is what revert scans for.
pub fn complete_goal(conn: &Connection, goal: &Goal) -> Result<GoalCompletion, TaskupError> {
    if goal.status == GoalStatus::Completed {
        return Err(TaskupError::validation(format!(
            "Goal {} is already completed",
            goal.id
        )));
    }

    let unfinished = goal_repo::unfinished_task_count(conn, &goal.id)?;
    if unfinished > 0 {
        return Err(TaskupError::goal_tasks_incomplete(&goal.id, unfinished));
    }

    let tasks = goal_repo::linked_tasks(conn, &goal.id)?;
    if tasks.is_empty() {
        return Err(TaskupError::validation(format!(
            "Goal {} has no linked tasks",
            goal.id
        )));
    }

    let goal_assignees = goal_repo::list_assignees(conn, &goal.id)?;
    if goal_assignees.is_empty() {
        return Err(TaskupError::no_assignees(&goal.id));
    }
    let goal_member_ids: HashSet<&str> =
        goal_assignees.iter().map(|u| u.id.as_str()).collect();

    // Reward share carried by each linked task.
    let per_task = goal.points as f64 / tasks.len() as f64;

    let mut accrued: HashMap<String, i64> = HashMap::new();
    let mut unattributed_tasks = 0usize;
    for task in &tasks {
        debug_assert_eq!(task.status, TaskStatus::Done);
        let task_assignees = task_repo::list_assignees(conn, &task.id)?;
        let eligible: Vec<String> = task_assignees
            .iter()
            .filter(|u| goal_member_ids.contains(u.id.as_str()))
            .map(|u| u.id.clone())
            .collect();
        if eligible.is_empty() {
            unattributed_tasks += 1;
            continue;
        }
        let per_user = (per_task / eligible.len() as f64).round() as i64;
        for id in eligible {
            *accrued.entry(id).or_insert(0) += per_user;
        }
    }

    let mut recipients = Vec::new();
    let mut points_distributed = 0i64;
    for user in &goal_assignees {
        let Some(&amount) = accrued.get(&user.id) else {
            continue;
        };
        if amount == 0 {
            continue;
        }
        points_repo::record_transaction(
            conn,
            &user.id,
            &goal.org_id,
            None,
            TransactionType::TaskCompleted,
            amount,
            &TransactionMeta::TaskCompleted {
                task_title: goal.name.clone(),
                goal_id: Some(goal.id.clone()),
            },
        )?;
        points_distributed += amount;
        recipients.push(Recipient {
            handle: user.handle.clone(),
            points: amount,
        });
    }

    goal_repo::update_goal_status(conn, &goal.id, &GoalStatus::Completed)?;

    let warning = (unattributed_tasks > 0).then(|| {
        format!(
            "{unattributed_tasks} linked task(s) share no assignees with the goal; their reward share was not distributed"
        )
    });

    Ok(GoalCompletion {
        points_distributed,
        recipients,
        warning,
    })
}

/// Undo a goal completion by appending counter-entries.
///
/// The original award rows are never touched: for each `task_completed` row
/// in the organization whose metadata carries this goal's id (and which has
/// not already been negated), one `task_uncompleted` row with the opposite
/// sign is appended. The goal returns to active.
pub fn revert_goal_completion(conn: &Connection, goal: &Goal) -> Result<GoalReversal, TaskupError> {
    if goal.status != GoalStatus::Completed {
        return Err(TaskupError::goal_not_completed(&goal.id));
    }

    // Ids of award rows that already have a counter-entry, so a complete →
    // revert → complete → revert sequence never negates a row twice.
    let already_reverted: HashSet<String> =
        points_repo::transactions_for_org(conn, &goal.org_id, TransactionType::TaskUncompleted)?
            .into_iter()
            .filter_map(|tx| match tx.metadata {
                TransactionMeta::TaskUncompleted { reverts, .. } => reverts,
                _ => None,
            })
            .collect();

    let awards =
        points_repo::transactions_for_org(conn, &goal.org_id, TransactionType::TaskCompleted)?;

    let mut transactions_reverted = 0i64;
    let mut points_reclaimed = 0i64;
    for tx in awards {
        if tx.metadata.goal_id() != Some(goal.id.as_str()) {
            continue;
        }
        if already_reverted.contains(&tx.id) {
            continue;
        }
        let task_title = match &tx.metadata {
            TransactionMeta::TaskCompleted { task_title, .. } => task_title.clone(),
            _ => goal.name.clone(),
        };
        points_repo::record_transaction(
            conn,
            &tx.user_id,
            &goal.org_id,
            tx.task_id.as_deref(),
            TransactionType::TaskUncompleted,
            -tx.points_change,
            &TransactionMeta::TaskUncompleted {
                task_title,
                goal_id: Some(goal.id.clone()),
                reverts: Some(tx.id.clone()),
            },
        )?;
        transactions_reverted += 1;
        points_reclaimed += tx.points_change;
    }

    goal_repo::update_goal_status(conn, &goal.id, &GoalStatus::Active)?;

    Ok(GoalReversal {
        transactions_reverted,
        points_reclaimed,
    })
}
