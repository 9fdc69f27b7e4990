use rusqlite::{params, Connection};

use crate::error::TaskupError;
use crate::models::Organization;

pub fn create_org(
    conn: &Connection,
    id: &str,
    name: &str,
    title: &str,
) -> Result<Organization, TaskupError> {
    if find_org_by_name(conn, name)?.is_some() {
        return Err(TaskupError::org_name_conflict(name));
    }

    conn.execute(
        "INSERT INTO organizations (id, name, title) VALUES (?1, ?2, ?3)",
        params![id, name, title],
    )?;

    get_org_by_id(conn, id)
}

pub fn get_org_by_id(conn: &Connection, id: &str) -> Result<Organization, TaskupError> {
    conn.query_row(
        "SELECT id, name, title, created_at, updated_at FROM organizations WHERE id = ?1",
        params![id],
        row_to_org,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => TaskupError::org_not_found(id),
        _ => TaskupError::from(e),
    })
}

pub fn find_org_by_name(conn: &Connection, name: &str) -> Result<Option<Organization>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, title, created_at, updated_at FROM organizations WHERE name = ?1",
    )?;
    let mut rows = stmt.query(params![name])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_org(row)?)),
        None => Ok(None),
    }
}

/// Resolve an org reference: exact name → ULID prefix.
pub fn resolve_org(conn: &Connection, reference: &str) -> Result<Organization, TaskupError> {
    if let Some(org) = find_org_by_name(conn, reference)? {
        return Ok(org);
    }

    let mut stmt = conn.prepare(
        "SELECT id, name, title, created_at, updated_at FROM organizations WHERE id LIKE ?1",
    )?;
    let prefix = format!("{reference}%");
    let orgs: Vec<Organization> = stmt
        .query_map(params![prefix], row_to_org)?
        .collect::<Result<Vec<_>, _>>()?;

    match orgs.len() {
        0 => Err(TaskupError::org_not_found(reference)),
        1 => Ok(orgs.into_iter().next().unwrap()),
        _ => {
            let candidates: Vec<String> =
                orgs.iter().map(|o| format!("{} ({})", o.name, o.id)).collect();
            Err(TaskupError::ambiguous_ref(reference, &candidates))
        }
    }
}

pub fn list_orgs(conn: &Connection) -> Result<Vec<Organization>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, title, created_at, updated_at FROM organizations ORDER BY created_at ASC, id ASC",
    )?;
    let orgs = stmt
        .query_map([], row_to_org)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(orgs)
}

fn row_to_org(row: &rusqlite::Row) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        title: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}
