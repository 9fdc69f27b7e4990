use rusqlite::{params, Connection};

use crate::error::TaskupError;
use crate::models::{PointTransaction, TransactionMeta, TransactionType, UserPoints};

/// Result of applying one ledger entry.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct Applied {
    pub previous_total: i64,
    pub new_total: i64,
}

pub fn get_user_points(
    conn: &Connection,
    user_id: &str,
    org_id: &str,
) -> Result<Option<UserPoints>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, org_id, total_points, updated_at
         FROM user_points WHERE user_id = ?1 AND org_id = ?2",
    )?;
    let mut rows = stmt.query(params![user_id, org_id])?;
    match rows.next()? {
        Some(row) => Ok(Some(UserPoints {
            user_id: row.get(0)?,
            org_id: row.get(1)?,
            total_points: row.get(2)?,
            updated_at: row.get(3)?,
        })),
        None => Ok(None),
    }
}

/// The ledger primitive: fetch-or-create the running total, append one
/// immutable transaction row, update the total.
///
/// `new_total = previous_total + points_change` always holds for the inserted
/// row. Callers wrap multi-entry operations in a SQLite transaction so the
/// read-modify-write is atomic.
pub fn record_transaction(
    conn: &Connection,
    user_id: &str,
    org_id: &str,
    task_id: Option<&str>,
    tx_type: TransactionType,
    points_change: i64,
    metadata: &TransactionMeta,
) -> Result<Applied, TaskupError> {
    let previous_total = match get_user_points(conn, user_id, org_id)? {
        Some(up) => up.total_points,
        None => {
            conn.execute(
                "INSERT INTO user_points (user_id, org_id, total_points) VALUES (?1, ?2, 0)",
                params![user_id, org_id],
            )?;
            0
        }
    };
    let new_total = previous_total + points_change;

    let metadata_json = serde_json::to_string(metadata)
        .map_err(|e| TaskupError::database(format!("metadata serialization failed: {e}")))?;
    let tx_id = ulid::Ulid::new().to_string();
    conn.execute(
        "INSERT INTO point_transactions
         (id, user_id, org_id, task_id, tx_type, points_change, previous_total, new_total, metadata)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            tx_id,
            user_id,
            org_id,
            task_id,
            tx_type.as_str(),
            points_change,
            previous_total,
            new_total,
            metadata_json
        ],
    )?;

    conn.execute(
        "UPDATE user_points SET total_points = ?1, updated_at = datetime('now')
         WHERE user_id = ?2 AND org_id = ?3",
        params![new_total, user_id, org_id],
    )?;

    Ok(Applied {
        previous_total,
        new_total,
    })
}

/// A user's ledger, newest first.
pub fn list_transactions_for_user(
    conn: &Connection,
    user_id: &str,
    org_id: &str,
) -> Result<Vec<PointTransaction>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, org_id, task_id, tx_type, points_change,
                previous_total, new_total, metadata, created_at
         FROM point_transactions
         WHERE user_id = ?1 AND org_id = ?2
         ORDER BY created_at DESC, id DESC",
    )?;
    let txs = stmt
        .query_map(params![user_id, org_id], row_to_transaction)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(txs)
}

/// All transactions of one type in an org, oldest first. Goal revert scans
/// the award rows and filters on the metadata goal id; there is no direct
/// foreign key from a transaction to a goal.
pub fn transactions_for_org(
    conn: &Connection,
    org_id: &str,
    tx_type: TransactionType,
) -> Result<Vec<PointTransaction>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, org_id, task_id, tx_type, points_change,
                previous_total, new_total, metadata, created_at
         FROM point_transactions
         WHERE org_id = ?1 AND tx_type = ?2
         ORDER BY created_at ASC, id ASC",
    )?;
    let txs = stmt
        .query_map(params![org_id, tx_type.as_str()], row_to_transaction)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(txs)
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub handle: String,
    pub total_points: i64,
}

/// Per-org totals, highest first; ties broken by handle.
pub fn leaderboard(
    conn: &Connection,
    org_id: &str,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, TaskupError> {
    let mut stmt = conn.prepare(
        "SELECT up.user_id, u.handle, up.total_points
         FROM user_points up
         JOIN users u ON up.user_id = u.id
         WHERE up.org_id = ?1
         ORDER BY up.total_points DESC, u.handle ASC
         LIMIT ?2",
    )?;
    let entries = stmt
        .query_map(params![org_id, limit], |row| {
            Ok(LeaderboardEntry {
                user_id: row.get(0)?,
                handle: row.get(1)?,
                total_points: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(entries)
}

fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<PointTransaction> {
    let tx_type_raw: String = row.get(4)?;
    let metadata_raw: String = row.get(8)?;
    let metadata: TransactionMeta = serde_json::from_str(&metadata_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(PointTransaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        org_id: row.get(2)?,
        task_id: row.get(3)?,
        tx_type: TransactionType::from_str(&tx_type_raw)
            .unwrap_or(TransactionType::TaskCompleted),
        points_change: row.get(5)?,
        previous_total: row.get(6)?,
        new_total: row.get(7)?,
        metadata,
        created_at: row.get(9)?,
    })
}
