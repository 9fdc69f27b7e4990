use rusqlite::Connection;
use serde_json::json;

use crate::cli::commands::OrgCommands;
use crate::db::{connection, org_repo};
use crate::error::TaskupError;
use crate::output;

pub fn run(cmd: OrgCommands, json_output: bool, org_flag: Option<&str>) -> i32 {
    let result = match cmd {
        OrgCommands::Create { name, title } => run_create(&name, title.as_deref(), json_output),
        OrgCommands::List => run_list(json_output),
        OrgCommands::Show { reference } => run_show(reference.as_deref(), json_output, org_flag),
        OrgCommands::Activate { name } => run_activate(&name, json_output),
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

fn validate_org_name(name: &str) -> Result<(), TaskupError> {
    let valid = match name.len() {
        0 => false,
        1 => name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
        _ => {
            let chars: Vec<char> = name.chars().collect();
            let edge = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
            edge(chars[0])
                && edge(*chars.last().unwrap())
                && chars.iter().all(|c| edge(*c) || *c == '-')
        }
    };
    if !valid {
        return Err(TaskupError::validation(
            "Organization name must match ^[a-z0-9][a-z0-9-]*[a-z0-9]$ (or single char [a-z0-9])",
        ));
    }
    Ok(())
}

fn run_create(name: &str, title: Option<&str>, json_output: bool) -> Result<i32, TaskupError> {
    validate_org_name(name)?;
    let conn = connection::open_db()?;
    let id = ulid::Ulid::new().to_string();
    let title = title.unwrap_or(name);
    let org = org_repo::create_org(&conn, &id, name, title)?;

    // First org becomes active automatically.
    if get_active_org_id().is_none() {
        write_active_org(&org.id)?;
    }

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(output::json::org_json(&org))).unwrap()
        );
    } else {
        println!("Created organization: {} ({})", org.name, org.id);
    }
    Ok(0)
}

fn run_list(json_output: bool) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let orgs = org_repo::list_orgs(&conn)?;
    let active_id = get_active_org_id();

    if json_output {
        let orgs_json: Vec<_> = orgs
            .iter()
            .map(|o| {
                let mut v = output::json::org_json(o);
                if Some(&o.id) == active_id.as_ref() {
                    v["active"] = json!(true);
                }
                v
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({ "organizations": orgs_json })))
                .unwrap()
        );
    } else {
        output::text::print_org_list(&orgs, active_id.as_deref());
    }
    Ok(0)
}

fn run_show(
    reference: Option<&str>,
    json_output: bool,
    org_flag: Option<&str>,
) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org = match reference {
        Some(r) => org_repo::resolve_org(&conn, r)?,
        None => {
            let id = resolve_org_id(&conn, org_flag)?;
            org_repo::get_org_by_id(&conn, &id)?
        }
    };

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(output::json::org_json(&org))).unwrap()
        );
    } else {
        output::text::print_org(&org);
    }
    Ok(0)
}

fn run_activate(name: &str, json_output: bool) -> Result<i32, TaskupError> {
    let conn = connection::open_db()?;
    let org = org_repo::resolve_org(&conn, name)?;
    write_active_org(&org.id)?;

    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(&output::json::success(json!({
                "activated": { "id": org.id, "name": org.name }
            })))
            .unwrap()
        );
    } else {
        println!("Activated organization: {} ({})", org.name, org.id);
    }
    Ok(0)
}

fn write_active_org(org_id: &str) -> Result<(), TaskupError> {
    let config_path = connection::config_path()?;
    let config = json!({ "active_org_id": org_id });
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TaskupError::database(e.to_string()))?;
    }
    std::fs::write(&config_path, serde_json::to_string_pretty(&config).unwrap())
        .map_err(|e| TaskupError::database(e.to_string()))?;
    Ok(())
}

pub fn get_active_org_id() -> Option<String> {
    let config_path = connection::config_path().ok()?;
    let content = std::fs::read_to_string(config_path).ok()?;
    let config: serde_json::Value = serde_json::from_str(&content).ok()?;
    config["active_org_id"].as_str().map(|s| s.to_string())
}

/// Explicit `--org` wins; otherwise fall back to the configured active org.
pub fn resolve_org_id(conn: &Connection, org_flag: Option<&str>) -> Result<String, TaskupError> {
    if let Some(reference) = org_flag {
        let org = org_repo::resolve_org(conn, reference)?;
        return Ok(org.id);
    }
    let id = get_active_org_id().ok_or_else(TaskupError::no_active_org)?;
    // Validate that the active org still exists
    org_repo::get_org_by_id(conn, &id)?;
    Ok(id)
}
