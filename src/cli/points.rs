use serde_json::json;

use crate::cli::commands::PointsCommands;
use crate::cli::org::resolve_org_id;
use crate::db::{connection, points_repo, user_repo};
use crate::error::TaskupError;
use crate::output;

pub fn run(cmd: PointsCommands, json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = match cmd {
        PointsCommands::Leaderboard { limit } => run_leaderboard(limit, json_output, org_flag),
        PointsCommands::History { handle } => run_history(&handle, json_output, org_flag),
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            if json_output {
                println!("{}", serde_json::to_string_pretty(&output::json::error(&e)).unwrap());
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

fn run_leaderboard(limit: i64, json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    if limit < 1 {
        return Err(TaskupError::validation("--limit must be >= 1"));
    }
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let entries = points_repo::leaderboard(&conn, &org_id, limit)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "leaderboard": output::json::leaderboard_json(&entries)
            })))
            .unwrap()
        );
    } else {
        output::text::print_leaderboard(&entries);
    }
    Ok(0)
}

fn run_history(handle: &str, json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let user = user_repo::resolve_user(&conn, &org_id, handle)?;
    let txs = points_repo::list_transactions_for_user(&conn, &user.id, &org_id)?;
    let total = points_repo::get_user_points(&conn, &user.id, &org_id)?
        .map(|up| up.total_points)
        .unwrap_or(0);

    if json_output {
        let txs_json: Vec<_> = txs.iter().map(output::json::transaction_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "handle": user.handle,
                "total_points": total,
                "transactions": txs_json
            })))
            .unwrap()
        );
    } else {
        println!("@{} - {} points", user.handle, total);
        output::text::print_transactions(&txs);
    }
    Ok(0)
}
