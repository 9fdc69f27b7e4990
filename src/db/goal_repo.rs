use rusqlite::{params, Connection};

use crate::error::TaskupError;
use crate::models::{Difficulty, Goal, GoalStatus, Priority, Task, TaskStatus, User};

const GOAL_COLUMNS: &str =
    "id, org_id, name, description, points, due_date, status, created_at, updated_at";

pub fn create_goal(
    conn: &Connection,
    id: &str,
    org_id: &str,
    name: &str,
    description: Option<&str>,
    points: i64,
    due_date: Option<&str>,
) -> Result<Goal, TaskupError> {
    conn.execute(
        "INSERT INTO goals (id, org_id, name, description, points, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, org_id, name, description, points, due_date],
    )?;
    get_goal_by_id(conn, id)
}

pub fn get_goal_by_id(conn: &Connection, id: &str) -> Result<Goal, TaskupError> {
    conn.query_row(
        &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1"),
        params![id],
        row_to_goal,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskupError::goal_not_found(id),
        _ => TaskupError::from(e),
    })
}

/// Resolve a goal reference within an org: exact name → ULID prefix.
pub fn resolve_goal(conn: &Connection, org_id: &str, reference: &str) -> Result<Goal, TaskupError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE org_id = ?1 AND name = ?2"
    ))?;
    let mut rows = stmt.query(params![org_id, reference])?;
    if let Some(row) = rows.next()? {
        return Ok(row_to_goal(row)?);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE org_id = ?1 AND id LIKE ?2"
    ))?;
    let prefix = format!("{reference}%");
    let goals: Vec<Goal> = stmt
        .query_map(params![org_id, prefix], row_to_goal)?
        .collect::<Result<Vec<_>, _>>()?;

    match goals.len() {
        0 => Err(TaskupError::goal_not_found(reference)),
        1 => Ok(goals.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                goals.iter().map(|g| format!("{} ({})", g.name, g.id)).collect();
            Err(TaskupError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_goals(conn: &Connection, org_id: &str) -> Result<Vec<Goal>, TaskupError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {GOAL_COLUMNS} FROM goals WHERE org_id = ?1 ORDER BY created_at ASC, id ASC"
    ))?;
    let goals = stmt
        .query_map(params![org_id], row_to_goal)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(goals)
}

pub fn update_goal_status(
    conn: &Connection,
    id: &str,
    status: &GoalStatus,
) -> Result<(), TaskupError> {
    conn.execute(
        "UPDATE goals SET status = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![status.as_str(), id],
    )?;
    Ok(())
}

pub fn link_task(conn: &Connection, goal_id: &str, task_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "INSERT OR IGNORE INTO goal_tasks (goal_id, task_id) VALUES (?1, ?2)",
        params![goal_id, task_id],
    )?;
    Ok(())
}

pub fn unlink_task(conn: &Connection, goal_id: &str, task_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "DELETE FROM goal_tasks WHERE goal_id = ?1 AND task_id = ?2",
        params![goal_id, task_id],
    )?;
    Ok(())
}

pub fn add_assignee(conn: &Connection, goal_id: &str, user_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "INSERT OR IGNORE INTO goal_assignees (goal_id, user_id) VALUES (?1, ?2)",
        params![goal_id, user_id],
    )?;
    Ok(())
}

pub fn remove_assignee(conn: &Connection, goal_id: &str, user_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "DELETE FROM goal_assignees WHERE goal_id = ?1 AND user_id = ?2",
        params![goal_id, user_id],
    )?;
    Ok(())
}

pub fn list_assignees(conn: &Connection, goal_id: &str) -> Result<Vec<User>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.org_id, u.handle, u.display_name, u.created_at
         FROM goal_assignees ga
         JOIN users u ON ga.user_id = u.id
         WHERE ga.goal_id = ?1
         ORDER BY u.handle ASC",
    )?;
    let users = stmt
        .query_map(params![goal_id], |row| {
            Ok(User {
                id: row.get(0)?,
                org_id: row.get(1)?,
                handle: row.get(2)?,
                display_name: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

/// Tasks linked to a goal, in link-insertion order (rowid).
pub fn linked_tasks(conn: &Connection, goal_id: &str) -> Result<Vec<Task>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.org_id, t.title, t.description, t.status, t.priority, t.difficulty,
                t.due_date, t.score, t.created_at, t.updated_at, t.completed_at
         FROM goal_tasks gt
         JOIN tasks t ON gt.task_id = t.id
         WHERE gt.goal_id = ?1
         ORDER BY gt.rowid ASC",
    )?;
    let tasks = stmt
        .query_map(params![goal_id], |row| {
            Ok(Task {
                id: row.get(0)?,
                org_id: row.get(1)?,
                title: row.get(2)?,
                description: row.get(3)?,
                status: TaskStatus::from_str(&row.get::<_, String>(4)?)
                    .unwrap_or(TaskStatus::Backlog),
                priority: Priority::from_str(&row.get::<_, String>(5)?)
                    .unwrap_or(Priority::Medium),
                difficulty: Difficulty::from_str(&row.get::<_, String>(6)?)
                    .unwrap_or(Difficulty::Medium),
                due_date: row.get(7)?,
                score: row.get(8)?,
                created_at: row.get(9)?,
                updated_at: row.get(10)?,
                completed_at: row.get(11)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// Count of linked tasks that are not yet done.
pub fn unfinished_task_count(conn: &Connection, goal_id: &str) -> Result<i64, TaskupError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM goal_tasks gt
         JOIN tasks t ON gt.task_id = t.id
         WHERE gt.goal_id = ?1 AND t.status != 'done'",
        params![goal_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn row_to_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        org_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        points: row.get(4)?,
        due_date: row.get(5)?,
        status: GoalStatus::from_str(&row.get::<_, String>(6)?).unwrap_or(GoalStatus::Active),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
