use rusqlite::{params, Connection};

use crate::error::TaskupError;
use crate::models::{Difficulty, Priority, Task, TaskStatus, User};

const TASK_COLUMNS: &str = "id, org_id, title, description, status, priority, difficulty,
                due_date, score, created_at, updated_at, completed_at";

#[allow(clippy::too_many_arguments)]
pub fn create_task(
    conn: &Connection,
    id: &str,
    org_id: &str,
    title: &str,
    description: Option<&str>,
    priority: Priority,
    difficulty: Difficulty,
    due_date: Option<&str>,
    score: i64,
) -> Result<Task, TaskupError> {
    conn.execute(
        "INSERT INTO tasks (id, org_id, title, description, priority, difficulty, due_date, score)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            id,
            org_id,
            title,
            description,
            priority.as_str(),
            difficulty.as_str(),
            due_date,
            score
        ],
    )?;
    get_task_by_id(conn, id)
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Task, TaskupError> {
    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
        params![id],
        row_to_task,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskupError::task_not_found(id),
        _ => TaskupError::from(e),
    })
}

/// Resolve task by ID or ID prefix within an org.
pub fn resolve_task(conn: &Connection, org_id: &str, reference: &str) -> Result<Task, TaskupError> {
    // Exact ID match first
    if let Ok(task) = get_task_by_id(conn, reference) {
        if task.org_id == org_id {
            return Ok(task);
        }
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE org_id = ?1 AND id LIKE ?2"
    ))?;
    let prefix = format!("{reference}%");
    let tasks: Vec<Task> = stmt
        .query_map(params![org_id, prefix], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;

    match tasks.len() {
        0 => Err(TaskupError::task_not_found(reference)),
        1 => Ok(tasks.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                tasks.iter().map(|t| format!("{} ({})", t.title, t.id)).collect();
            Err(TaskupError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_tasks_by_org(conn: &Connection, org_id: &str) -> Result<Vec<Task>, TaskupError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE org_id = ?1 ORDER BY created_at ASC, id ASC"
    ))?;
    let tasks = stmt
        .query_map(params![org_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

pub fn update_task_status(
    conn: &Connection,
    id: &str,
    status: &TaskStatus,
) -> Result<(), TaskupError> {
    let completed_clause = match status {
        TaskStatus::Done => "completed_at = datetime('now'),",
        _ => "completed_at = NULL,",
    };
    let sql = format!(
        "UPDATE tasks SET status = ?1, {completed_clause}
         updated_at = datetime('now')
         WHERE id = ?2"
    );
    conn.execute(&sql, params![status.as_str(), id])?;
    Ok(())
}

pub fn update_task_score(conn: &Connection, id: &str, score: i64) -> Result<(), TaskupError> {
    conn.execute(
        "UPDATE tasks SET score = ?1, updated_at = datetime('now') WHERE id = ?2",
        params![score, id],
    )?;
    Ok(())
}

pub fn update_task_properties(
    conn: &Connection,
    id: &str,
    priority: Priority,
    difficulty: Difficulty,
    due_date: Option<&str>,
) -> Result<(), TaskupError> {
    conn.execute(
        "UPDATE tasks SET priority = ?1, difficulty = ?2, due_date = ?3,
         updated_at = datetime('now') WHERE id = ?4",
        params![priority.as_str(), difficulty.as_str(), due_date, id],
    )?;
    Ok(())
}

pub fn add_assignee(conn: &Connection, task_id: &str, user_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "INSERT OR IGNORE INTO task_assignees (task_id, user_id) VALUES (?1, ?2)",
        params![task_id, user_id],
    )?;
    Ok(())
}

pub fn remove_assignee(conn: &Connection, task_id: &str, user_id: &str) -> Result<(), TaskupError> {
    conn.execute(
        "DELETE FROM task_assignees WHERE task_id = ?1 AND user_id = ?2",
        params![task_id, user_id],
    )?;
    Ok(())
}

/// Current assignees of a task, ordered by handle for stable output.
pub fn list_assignees(conn: &Connection, task_id: &str) -> Result<Vec<User>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.org_id, u.handle, u.display_name, u.created_at
         FROM task_assignees ta
         JOIN users u ON ta.user_id = u.id
         WHERE ta.task_id = ?1
         ORDER BY u.handle ASC",
    )?;
    let users = stmt
        .query_map(params![task_id], |row| {
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

/// Get task status counts for an org.
pub fn task_progress(conn: &Connection, org_id: &str) -> Result<TaskProgress, TaskupError> {
    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM tasks WHERE org_id = ?1 GROUP BY status")?;
    let mut progress = TaskProgress::default();
    let rows = stmt.query_map(params![org_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;
    for row in rows {
        let (status, count) = row?;
        match status.as_str() {
            "backlog" => progress.backlog = count,
            "todo" => progress.todo = count,
            "in_progress" => progress.in_progress = count,
            "review" => progress.review = count,
            "done" => progress.done = count,
            "archived" => progress.archived = count,
            "canceled" => progress.canceled = count,
            _ => {}
        }
    }
    progress.total = progress.backlog
        + progress.todo
        + progress.in_progress
        + progress.review
        + progress.done
        + progress.archived
        + progress.canceled;
    progress.percentage = if progress.total > 0 {
        (progress.done as f64 / progress.total as f64) * 100.0
    } else {
        0.0
    };
    Ok(progress)
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct TaskProgress {
    pub total: i64,
    pub backlog: i64,
    pub todo: i64,
    pub in_progress: i64,
    pub review: i64,
    pub done: i64,
    pub archived: i64,
    pub canceled: i64,
    pub percentage: f64,
}

fn row_to_task(row: &rusqlite::Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        org_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: TaskStatus::from_str(&row.get::<_, String>(4)?).unwrap_or(TaskStatus::Backlog),
        priority: Priority::from_str(&row.get::<_, String>(5)?).unwrap_or(Priority::Medium),
        difficulty: Difficulty::from_str(&row.get::<_, String>(6)?).unwrap_or(Difficulty::Medium),
        due_date: row.get(7)?,
        score: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        completed_at: row.get(11)?,
    })
}
