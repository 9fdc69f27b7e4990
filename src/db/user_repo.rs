use rusqlite::{params, Connection};

use crate::error::TaskupError;
use crate::models::User;

pub fn create_user(
    conn: &Connection,
    id: &str,
    org_id: &str,
    handle: &str,
    display_name: Option<&str>,
) -> Result<User, TaskupError> {
    if find_user_by_handle(conn, org_id, handle)?.is_some() {
        return Err(TaskupError::handle_conflict(handle));
    }

    conn.execute(
        "INSERT INTO users (id, org_id, handle, display_name) VALUES (?1, ?2, ?3, ?4)",
        params![id, org_id, handle, display_name],
    )?;

    get_user_by_id(conn, id)
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<User, TaskupError> {
    conn.query_row(
        "SELECT id, org_id, handle, display_name, created_at FROM users WHERE id = ?1",
        params![id],
        row_to_user,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskupError::user_not_found(id),
        _ => TaskupError::from(e),
    })
}

pub fn find_user_by_handle(
    conn: &Connection,
    org_id: &str,
    handle: &str,
) -> Result<Option<User>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, org_id, handle, display_name, created_at
         FROM users WHERE org_id = ?1 AND handle = ?2",
    )?;
    let mut rows = stmt.query(params![org_id, handle])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_user(row)?)),
        None => Ok(None),
    }
}

/// Resolve a user reference within an org: exact handle → ULID prefix.
pub fn resolve_user(conn: &Connection, org_id: &str, reference: &str) -> Result<User, TaskupError> {
    if let Some(user) = find_user_by_handle(conn, org_id, reference)? {
        return Ok(user);
    }

    let mut stmt = conn.prepare(
        "SELECT id, org_id, handle, display_name, created_at
         FROM users WHERE org_id = ?1 AND id LIKE ?2",
    )?;
    let prefix = format!("{reference}%");
    let users: Vec<User> = stmt
        .query_map(params![org_id, prefix], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;

    match users.len() {
        0 => Err(TaskupError::user_not_found(reference)),
        1 => Ok(users.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                users.iter().map(|u| format!("{} ({})", u.handle, u.id)).collect();
            Err(TaskupError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_users(conn: &Connection, org_id: &str) -> Result<Vec<User>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, org_id, handle, display_name, created_at
         FROM users WHERE org_id = ?1 ORDER BY handle ASC",
    )?;
    let users = stmt
        .query_map(params![org_id], row_to_user)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(users)
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        org_id: row.get(1)?,
        handle: row.get(2)?,
        display_name: row.get(3)?,
        created_at: row.get(4)?,
    })
}
