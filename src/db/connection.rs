use std::env;
use std::fs;
use std::path::PathBuf;

use rusqlite::Connection;

use crate::error::{ErrorCode, TaskupError};

use super::migrations;

/// Find the .git root by walking up from current directory.
pub fn find_git_root() -> Result<PathBuf, TaskupError> {
    let mut dir = env::current_dir().map_err(|e| TaskupError::database(e.to_string()))?;
    loop {
        if dir.join(".git").exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TaskupError::new(
                ErrorCode::NotInitialized,
                "Not inside a git repository. taskup requires a git repository.",
            ));
        }
    }
}

/// Get the path to the taskup database.
pub fn db_path() -> Result<PathBuf, TaskupError> {
    let root = find_git_root()?;
    Ok(root.join(".taskup").join("taskup.db"))
}

/// Get the config file path.
pub fn config_path() -> Result<PathBuf, TaskupError> {
    let root = find_git_root()?;
    Ok(root.join(".taskup").join("config.json"))
}

/// Open a connection to the database. Returns error if not initialized.
pub fn open_db() -> Result<Connection, TaskupError> {
    let path = db_path()?;
    if !path.exists() {
        return Err(TaskupError::not_initialized());
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    Ok(conn)
}

/// Initialize the database: create directories, database, and run migrations.
pub fn init_db() -> Result<PathBuf, TaskupError> {
    let path = db_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TaskupError::database(e.to_string()))?;
    }
    let conn = Connection::open(&path)?;
    configure_connection(&conn)?;
    migrations::run_migrations(&conn)?;
    Ok(path)
}

fn configure_connection(conn: &Connection) -> Result<(), TaskupError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}
