use chrono::Utc;
use serde_json::json;

use crate::cli::commands::TaskCommands;
use crate::cli::org::resolve_org_id;
use crate::db::{connection, task_repo, user_repo};
use crate::error::TaskupError;
use crate::ledger::task_points;
use crate::models::{Difficulty, Priority, TaskStatus};
use crate::output;
use crate::scoring;

pub fn run(cmd: TaskCommands, json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = match cmd {
        TaskCommands::Add {
            title,
            description,
            priority,
            difficulty,
            due,
            assign,
        } => run_add(
            &title,
            description.as_deref(),
            &priority,
            &difficulty,
            due.as_deref(),
            &assign,
            json_output,
            org_flag,
        ),
        TaskCommands::List => run_list(json_output, org_flag),
        TaskCommands::Show { id } => run_show(&id, json_output, org_flag),
        TaskCommands::Status { id, status } => run_status(&id, &status, json_output, org_flag),
        TaskCommands::Set {
            id,
            priority,
            difficulty,
            due,
            clear_due,
        } => run_set(
            &id,
            priority.as_deref(),
            difficulty.as_deref(),
            due.as_deref(),
            clear_due,
            json_output,
            org_flag,
        ),
        TaskCommands::Assign { id, handle } => run_assign(&id, &handle, true, json_output, org_flag),
        TaskCommands::Unassign { id, handle } => {
            run_assign(&id, &handle, false, json_output, org_flag)
        }
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

fn parse_priority(s: &str) -> Result<Priority, TaskupError> {
    Priority::from_str(s)
        .ok_or_else(|| TaskupError::validation(format!("Invalid priority '{s}' (low, medium, high, urgent)")))
}

fn parse_difficulty(s: &str) -> Result<Difficulty, TaskupError> {
    Difficulty::from_str(s)
        .ok_or_else(|| TaskupError::validation(format!("Invalid difficulty '{s}' (easy, medium, hard)")))
}

fn parse_status(s: &str) -> Result<TaskStatus, TaskupError> {
    TaskStatus::from_str(s).ok_or_else(|| {
        TaskupError::validation(format!(
            "Invalid status '{s}' (backlog, todo, in_progress, review, done, archived, canceled)"
        ))
    })
}

fn validate_due_date(due: &str) -> Result<(), TaskupError> {
    if scoring::parse_due_date(due).is_none() {
        return Err(TaskupError::validation(format!(
            "Invalid due date '{due}' (expected YYYY-MM-DD)"
        )));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_add(
    title: &str,
    description: Option<&str>,
    priority: &str,
    difficulty: &str,
    due: Option<&str>,
    assign: &[String],
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    if title.is_empty() {
        return Err(TaskupError::validation("Task title is required"));
    }
    let priority = parse_priority(priority)?;
    let difficulty = parse_difficulty(difficulty)?;
    if let Some(due) = due {
        validate_due_date(due)?;
    }

    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;

    // Resolve assignees first (before any writes) to fail fast
    let mut assignees = Vec::new();
    for handle in assign {
        assignees.push(user_repo::resolve_user(&conn, &org_id, handle)?);
    }

    let task_id = ulid::Ulid::new().to_string();
    let score = scoring::base_score(difficulty);

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<_, TaskupError> {
        task_repo::create_task(
            &conn, &task_id, &org_id, title, description, priority, difficulty, due, score,
        )?;
        for user in &assignees {
            task_repo::add_assignee(&conn, &task_id, &user.id)?;
        }
        Ok(())
    })();

    match result {
        Ok(()) => conn.execute_batch("COMMIT")?,
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            return Err(e);
        }
    }

    let task = task_repo::get_task_by_id(&conn, &task_id)?;
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_summary(&task)
            })))
            .unwrap()
        );
    } else {
        println!("Added task: {} ({})", task.title, task.id);
    }
    Ok(0)
}

fn run_list(json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let tasks = task_repo::list_tasks_by_org(&conn, &org_id)?;

    if json_output {
        let tasks_json: Vec<_> = tasks.iter().map(output::json::task_summary).collect();
        let progress = task_repo::task_progress(&conn, &org_id)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "tasks": tasks_json,
                "progress": output::json::progress_json(&progress)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task_list(&tasks);
    }
    Ok(0)
}

fn run_show(id: &str, json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let task = task_repo::resolve_task(&conn, &org_id, id)?;
    let assignees = task_repo::list_assignees(&conn, &task.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "task": output::json::task_detail(&task, &assignees)
            })))
            .unwrap()
        );
    } else {
        output::text::print_task(&task, &assignees);
    }
    Ok(0)
}

fn validate_transition(current: &TaskStatus, next: &TaskStatus) -> Result<(), TaskupError> {
    if current.is_terminal() || current == next {
        return Err(TaskupError::invalid_transition(current.as_str(), next.as_str()));
    }
    Ok(())
}

fn run_status(
    id: &str,
    status: &str,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let new_status = parse_status(status)?;
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let task = task_repo::resolve_task(&conn, &org_id, id)?;

    validate_transition(&task.status, &new_status)?;

    let entering_done = new_status == TaskStatus::Done && task.status != TaskStatus::Done;
    let leaving_done = task.status == TaskStatus::Done && new_status != TaskStatus::Done;
    let today = Utc::now().date_naive();

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<_, TaskupError> {
        let mut distribution = None;

        if entering_done {
            let score = scoring::compute_score(
                task.difficulty,
                task.due_date.as_deref(),
                &TaskStatus::Done,
                task.score,
                today,
            );
            task_repo::update_task_status(&conn, &task.id, &new_status)?;
            task_repo::update_task_score(&conn, &task.id, score)?;
            distribution = Some(task_points::award(&conn, &task, score)?);
        } else if leaving_done {
            // Deduct what was actually awarded, then drop back to the base.
            distribution = Some(task_points::deduct(&conn, &task, task.score)?);
            task_repo::update_task_status(&conn, &task.id, &new_status)?;
            task_repo::update_task_score(&conn, &task.id, scoring::base_score(task.difficulty))?;
        } else {
            task_repo::update_task_status(&conn, &task.id, &new_status)?;
        }

        let updated = task_repo::get_task_by_id(&conn, &task.id)?;
        Ok((updated, distribution))
    })();

    match result {
        Ok((updated, distribution)) => {
            conn.execute_batch("COMMIT")?;

            if json_output {
                let mut data = json!({
                    "task": output::json::task_summary(&updated)
                });
                let mut warning = None;
                if let Some(d) = distribution {
                    warning = d.warning.clone();
                    data["points"] = json!({
                        "per_assignee": d.per_assignee,
                        "recipients": d.recipients
                    });
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success_with_warning(
                        data,
                        warning.as_deref()
                    ))
                    .unwrap()
                );
            } else {
                println!("Task {} → {}", updated.id, updated.status.as_str());
                if let Some(d) = distribution {
                    if let Some(w) = &d.warning {
                        println!("Warning: {w}");
                    } else if d.per_assignee != 0 {
                        println!(
                            "Points: {:+} for each of {} assignee(s)",
                            d.per_assignee, d.recipients
                        );
                    }
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

fn run_set(
    id: &str,
    priority: Option<&str>,
    difficulty: Option<&str>,
    due: Option<&str>,
    clear_due: bool,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    if priority.is_none() && difficulty.is_none() && due.is_none() && !clear_due {
        return Err(TaskupError::validation(
            "Nothing to change: pass --priority, --difficulty, --due or --clear-due",
        ));
    }

    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let task = task_repo::resolve_task(&conn, &org_id, id)?;
    if task.status.is_terminal() {
        return Err(TaskupError::validation(format!(
            "Task {} is {}; properties are frozen",
            task.id,
            task.status.as_str()
        )));
    }

    let new_priority = match priority {
        Some(p) => parse_priority(p)?,
        None => task.priority,
    };
    let new_difficulty = match difficulty {
        Some(d) => parse_difficulty(d)?,
        None => task.difficulty,
    };
    let new_due: Option<String> = if clear_due {
        None
    } else {
        match due {
            Some(d) => {
                validate_due_date(d)?;
                Some(d.to_string())
            }
            None => task.due_date.clone(),
        }
    };

    // Which scoring-relevant properties changed. Priority never pays points,
    // so a priority-only edit updates the row and writes no transaction.
    let mut changed_props = Vec::new();
    let mut old_values = Vec::new();
    let mut new_values = Vec::new();
    if new_difficulty != task.difficulty {
        changed_props.push("difficulty");
        old_values.push(task.difficulty.as_str().to_string());
        new_values.push(new_difficulty.as_str().to_string());
    }
    if new_due != task.due_date {
        changed_props.push("due_date");
        old_values.push(task.due_date.clone().unwrap_or_else(|| "none".into()));
        new_values.push(new_due.clone().unwrap_or_else(|| "none".into()));
    }

    let today = Utc::now().date_naive();

    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<_, TaskupError> {
        task_repo::update_task_properties(
            &conn,
            &task.id,
            new_priority,
            new_difficulty,
            new_due.as_deref(),
        )?;

        let mut distribution = None;
        if task.status == TaskStatus::Done && !changed_props.is_empty() {
            let old_score = task.score;
            let new_score = scoring::compute_score(
                new_difficulty,
                new_due.as_deref(),
                &TaskStatus::Done,
                old_score,
                today,
            );
            if new_score != old_score {
                task_repo::update_task_score(&conn, &task.id, new_score)?;
            }
            distribution = Some(task_points::adjust(
                &conn,
                &task,
                old_score,
                new_score,
                &changed_props.join(","),
                &old_values.join(","),
                &new_values.join(","),
            )?);
        } else if new_difficulty != task.difficulty {
            // Not done: keep the stored base in step with difficulty.
            task_repo::update_task_score(&conn, &task.id, scoring::base_score(new_difficulty))?;
        }

        let updated = task_repo::get_task_by_id(&conn, &task.id)?;
        Ok((updated, distribution))
    })();

    match result {
        Ok((updated, distribution)) => {
            conn.execute_batch("COMMIT")?;

            if json_output {
                let mut data = json!({
                    "task": output::json::task_summary(&updated)
                });
                if let Some(d) = &distribution {
                    data["adjustment"] = json!({
                        "per_assignee": d.per_assignee,
                        "recipients": d.recipients
                    });
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&output::json::success(data)).unwrap()
                );
            } else {
                println!("Updated task {}", updated.id);
                if let Some(d) = &distribution {
                    if d.per_assignee != 0 {
                        println!(
                            "Adjustment: {:+} for each of {} assignee(s)",
                            d.per_assignee, d.recipients
                        );
                    }
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

fn run_assign(
    id: &str,
    handle: &str,
    add: bool,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let task = task_repo::resolve_task(&conn, &org_id, id)?;
    let user = user_repo::resolve_user(&conn, &org_id, handle)?;

    if add {
        task_repo::add_assignee(&conn, &task.id, &user.id)?;
    } else {
        task_repo::remove_assignee(&conn, &task.id, &user.id)?;
    }

    let verb = if add { "assigned" } else { "unassigned" };
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "action": verb,
                "task_id": task.id,
                "handle": user.handle
            })))
            .unwrap()
        );
    } else {
        println!("{} @{} {} task {}", verb, user.handle, if add { "to" } else { "from" }, task.id);
    }
    Ok(0)
}
