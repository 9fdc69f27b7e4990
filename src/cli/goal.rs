use serde_json::json;

use crate::cli::commands::GoalCommands;
use crate::cli::org::resolve_org_id;
use crate::db::{connection, goal_repo, task_repo, user_repo};
use crate::error::TaskupError;
use crate::ledger::goal_points;
use crate::output;
use crate::scoring;

pub fn run(cmd: GoalCommands, json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = match cmd {
        GoalCommands::Create {
            name,
            points,
            description,
            due,
        } => run_create(&name, points, description.as_deref(), due.as_deref(), json_output, org_flag),
        GoalCommands::List => run_list(json_output, org_flag),
        GoalCommands::Show { reference } => run_show(&reference, json_output, org_flag),
        GoalCommands::Link { goal, task } => run_link(&goal, &task, true, json_output, org_flag),
        GoalCommands::Unlink { goal, task } => run_link(&goal, &task, false, json_output, org_flag),
        GoalCommands::Assign { goal, handle } => {
            run_assign(&goal, &handle, true, json_output, org_flag)
        }
        GoalCommands::Unassign { goal, handle } => {
            run_assign(&goal, &handle, false, json_output, org_flag)
        }
        GoalCommands::Complete { reference } => run_complete(&reference, json_output, org_flag),
        GoalCommands::Revert { reference } => run_revert(&reference, json_output, org_flag),
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

fn run_create(
    name: &str,
    points: i64,
    description: Option<&str>,
    due: Option<&str>,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    if name.is_empty() {
        return Err(TaskupError::validation("Goal name is required"));
    }
    if points < 0 {
        return Err(TaskupError::validation("Goal points must be >= 0"));
    }
    if let Some(due) = due {
        if scoring::parse_due_date(due).is_none() {
            return Err(TaskupError::validation(format!(
                "Invalid due date '{due}' (expected YYYY-MM-DD)"
            )));
        }
    }

    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let id = ulid::Ulid::new().to_string();
    let goal = goal_repo::create_goal(&conn, &id, &org_id, name, description, points, due)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "goal": output::json::goal_json(&goal)
            })))
            .unwrap()
        );
    } else {
        println!("Created goal: {} ({})", goal.name, goal.id);
    }
    Ok(0)
}

fn run_list(json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goals = goal_repo::list_goals(&conn, &org_id)?;

    if json_output {
        let goals_json: Vec<_> = goals.iter().map(output::json::goal_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "goals": goals_json })))
                .unwrap()
        );
    } else {
        output::text::print_goal_list(&goals);
    }
    Ok(0)
}

fn run_show(reference: &str, json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goal = goal_repo::resolve_goal(&conn, &org_id, reference)?;
    let assignees = goal_repo::list_assignees(&conn, &goal.id)?;
    let tasks = goal_repo::linked_tasks(&conn, &goal.id)?;

    if json_output {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "goal": output::json::goal_json(&goal),
                "assignees": assignees.iter().map(|u| json!(u.handle)).collect::<Vec<_>>(),
                "tasks": tasks_json
            })))
            .unwrap()
        );
    } else {
        output::text::print_goal(&goal, &assignees, &tasks);
    }
    Ok(0)
}

fn run_link(
    goal_ref: &str,
    task_ref: &str,
    link: bool,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goal = goal_repo::resolve_goal(&conn, &org_id, goal_ref)?;
    let task = task_repo::resolve_task(&conn, &org_id, task_ref)?;

    if link {
        goal_repo::link_task(&conn, &goal.id, &task.id)?;
    } else {
        goal_repo::unlink_task(&conn, &goal.id, &task.id)?;
    }

    let verb = if link { "linked" } else { "unlinked" };
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "action": verb,
                "goal_id": goal.id,
                "task_id": task.id
            })))
            .unwrap()
        );
    } else {
        println!("{} task {} {} goal {}", verb, task.id, if link { "to" } else { "from" }, goal.id);
    }
    Ok(0)
}

fn run_assign(
    goal_ref: &str,
    handle: &str,
    add: bool,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goal = goal_repo::resolve_goal(&conn, &org_id, goal_ref)?;
    let user = user_repo::resolve_user(&conn, &org_id, handle)?;

    if add {
        goal_repo::add_assignee(&conn, &goal.id, &user.id)?;
    } else {
        goal_repo::remove_assignee(&conn, &goal.id, &user.id)?;
    }

    let verb = if add { "assigned" } else { "unassigned" };
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "action": verb,
                "goal_id": goal.id,
                "handle": user.handle
            })))
            .unwrap()
        );
    } else {
        println!("{} @{} {} goal {}", verb, user.handle, if add { "to" } else { "from" }, goal.id);
    }
    Ok(0)
}

fn run_complete(
    reference: &str,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goal = goal_repo::resolve_goal(&conn, &org_id, reference)?;

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = goal_points::complete_goal(&conn, &goal);
    match result {
        Ok(completion) => {
            conn.execute_batch("COMMIT")?;

            if json_output {
                let data = json!({
                    "goal": { "id": goal.id, "name": goal.name, "status": "completed" },
                    "points_distributed": completion.points_distributed,
                    "recipients": completion.recipients.iter().map(|r| json!({
                        "handle": r.handle,
                        "points": r.points
                    })).collect::<Vec<_>>()
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success_with_warning(
                        data,
                        completion.warning.as_deref()
                    ))
                    .unwrap()
                );
            } else {
                println!(
                    "Completed goal {} ({} points distributed)",
                    goal.name, completion.points_distributed
                );
                for r in &completion.recipients {
                    println!("  @{} +{}", r.handle, r.points);
                }
                if let Some(w) = &completion.warning {
                    println!("Warning: {w}");
                }
            }
            Ok(0)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

fn run_revert(
    reference: &str,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let goal = goal_repo::resolve_goal(&conn, &org_id, reference)?;

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = goal_points::revert_goal_completion(&conn, &goal);
    match result {
        Ok(reversal) => {
            conn.execute_batch("COMMIT")?;

            if json_output {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success(json!({
                        "goal": { "id": goal.id, "name": goal.name, "status": "active" },
                        "transactions_reverted": reversal.transactions_reverted,
                        "points_reclaimed": reversal.points_reclaimed
                    })))
                    .unwrap()
                );
            } else {
                println!(
                    "Reverted goal {} ({} transaction(s), {} points reclaimed)",
                    goal.name, reversal.transactions_reverted, reversal.points_reclaimed
                );
            }
            Ok(0)
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}
