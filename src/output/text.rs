use crate::db::points_repo::LeaderboardEntry;
use crate::db::task_repo::TaskProgress;
use crate::models::{Goal, Organization, PointTransaction, Task, User};

pub fn print_org(o: &Organization) {
    println!("Organization: {} ({})", o.name, o.id);
    println!("  Title: {}", o.title);
    println!("  Created: {}", o.created_at);
}

pub fn print_org_list(orgs: &[Organization], active_id: Option<&str>) {
    if orgs.is_empty() {
        println!("No organizations found.");
        return;
    }
    for o in orgs {
        let marker = if Some(o.id.as_str()) == active_id { " *" } else { "" };
        println!("  {} ({}) - {}{}", o.name, &o.id[..8], o.title, marker);
    }
}

pub fn print_user_list(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for u in users {
        let name = u.display_name.as_deref().unwrap_or("");
        println!("  @{} ({}) {}", u.handle, &u.id[..8], name);
    }
}

pub fn print_task(t: &Task, assignees: &[User]) {
    println!("Task: {} ({})", t.title, t.id);
    if let Some(ref desc) = t.description {
        println!("  Description: {desc}");
    }
    println!("  Status: {}", t.status.as_str());
    println!("  Priority: {}", t.priority.as_str());
    println!("  Difficulty: {}", t.difficulty.as_str());
    if let Some(ref due) = t.due_date {
        println!("  Due: {due}");
    }
    println!("  Score: {}", t.score);
    if !assignees.is_empty() {
        let handles: Vec<String> = assignees.iter().map(|u| format!("@{}", u.handle)).collect();
        println!("  Assignees: {}", handles.join(" "));
    }
    if let Some(ref completed) = t.completed_at {
        println!("  Completed: {completed}");
    }
}

pub fn print_task_list(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }
    for t in tasks {
        println!(
            "  [{}] {} ({}) {}/{} score={}",
            t.status.as_str(),
            t.title,
            &t.id[..std::cmp::min(8, t.id.len())],
            t.priority.as_str(),
            t.difficulty.as_str(),
            t.score
        );
    }
}

pub fn print_goal(g: &Goal, assignees: &[User], tasks: &[Task]) {
    println!("Goal: {} ({})", g.name, g.id);
    if let Some(ref desc) = g.description {
        println!("  Description: {desc}");
    }
    println!("  Status: {}", g.status.as_str());
    println!("  Reward: {} points", g.points);
    if let Some(ref due) = g.due_date {
        println!("  Due: {due}");
    }
    if !assignees.is_empty() {
        let handles: Vec<String> = assignees.iter().map(|u| format!("@{}", u.handle)).collect();
        println!("  Assignees: {}", handles.join(" "));
    }
    if !tasks.is_empty() {
        println!("  Linked tasks:");
        for t in tasks {
            println!("    [{}] {} ({})", t.status.as_str(), t.title, &t.id[..8]);
        }
    }
}

pub fn print_goal_list(goals: &[Goal]) {
    if goals.is_empty() {
        println!("No goals found.");
        return;
    }
    for g in goals {
        println!(
            "  [{}] {} ({}) reward={}",
            g.status.as_str(),
            g.name,
            &g.id[..8],
            g.points
        );
    }
}

pub fn print_progress(p: &TaskProgress) {
    println!("Progress: {:.1}% ({}/{})", p.percentage, p.done, p.total);
    println!(
        "  backlog={} todo={} in_progress={} review={} done={} archived={} canceled={}",
        p.backlog, p.todo, p.in_progress, p.review, p.done, p.archived, p.canceled
    );
}

pub fn print_leaderboard(entries: &[LeaderboardEntry]) {
    if entries.is_empty() {
        println!("No points recorded yet.");
        return;
    }
    for (i, e) in entries.iter().enumerate() {
        println!("  {}. @{} - {} points", i + 1, e.handle, e.total_points);
    }
}

pub fn print_transactions(txs: &[PointTransaction]) {
    if txs.is_empty() {
        println!("No transactions found.");
        return;
    }
    for tx in txs {
        println!(
            "  {} {:>+5} ({} -> {}) [{}]",
            tx.created_at, tx.points_change, tx.previous_total, tx.new_total,
            tx.tx_type.as_str()
        );
    }
}
