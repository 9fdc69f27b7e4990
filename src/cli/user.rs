use serde_json::json;

use crate::cli::commands::UserCommands;
use crate::cli::org::resolve_org_id;
use crate::db::{connection, user_repo};
use crate::error::TaskupError;
use crate::output;

pub fn run(cmd: UserCommands, json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = match cmd {
        UserCommands::Add { handle, name } => {
            run_add(&handle, name.as_deref(), json_output, org_flag)
        }
        UserCommands::List => run_list(json_output, org_flag),
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

fn validate_handle(handle: &str) -> Result<(), TaskupError> {
    if handle.is_empty()
        || !handle
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(TaskupError::validation(
            "Handle must be lowercase alphanumeric with '-' or '_'",
        ));
    }
    Ok(())
}

fn run_add(
    handle: &str,
    name: Option<&str>,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    validate_handle(handle)?;
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let id = ulid::Ulid::new().to_string();
    let user = user_repo::create_user(&conn, &id, &org_id, handle, name)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "user": output::json::user_json(&user)
            })))
            .unwrap()
        );
    } else {
        println!("Added user: @{} ({})", user.handle, user.id);
    }
    Ok(0)
}

fn run_list(json_output: bool, org_flag: Option<&str>) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org_id = resolve_org_id(&conn, org_flag)?;
    let users = user_repo::list_users(&conn, &org_id)?;

    if json_output {
        let users_json: Vec<_> = users.iter().map(output::json::user_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "users": users_json })))
                .unwrap()
        );
    } else {
        output::text::print_user_list(&users);
    }
    Ok(0)
}
