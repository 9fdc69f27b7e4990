use serde_json::json;

use crate::cli::org::resolve_org_id;
use crate::db::{connection, goal_repo, org_repo, points_repo, task_repo};
use crate::error::TaskupError;
use crate::output;

pub fn run(json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = run_inner(json_output, org_flag);
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

fn run_inner(json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let org = org_repo::get_org_by_id(&conn, &org_id)?;
    let progress = task_repo::task_progress(&conn, &org_id)?;
    let goals = goal_repo::list_goals(&conn, &org_id)?;
    let leaderboard = points_repo::leaderboard(&conn, &org_id, 5)?;

    if json_output {
        let goals_json: Vec<_> = goals.iter().map(output::json::goal_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "organization": output::json::org_json(&org),
                "progress": output::json::progress_json(&progress),
                "goals": goals_json,
                "leaderboard": output::json::leaderboard_json(&leaderboard)
            })))
            .unwrap()
        );
    } else {
        output::text::print_org(&org);
        println!();
        output::text::print_progress(&progress);
        if !goals.is_empty() {
            println!("\nGoals:");
            output::text::print_goal_list(&goals);
        }
        if !leaderboard.is_empty() {
            println!("\nLeaderboard:");
            output::text::print_leaderboard(&leaderboard);
        }
    }
    Ok(0)
}
