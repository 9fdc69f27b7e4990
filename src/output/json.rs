use serde_json::{json, Value};

use crate::db::points_repo::LeaderboardEntry;
use crate::db::task_repo::TaskProgress;
use crate::error::TaskupError;
use crate::models::{Goal, Organization, PointTransaction, Task, User};

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn success_with_warning(data: Value, warning: Option<&str>) -> Value {
    let mut v = success(data);
    if let Some(w) = warning {
        v["warning"] = json!(w);
    }
    v
}

pub fn error(err: &TaskupError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn org_json(o: &Organization) -> Value {
    json!({
        "id": o.id,
        "name": o.name,
        "title": o.title,
        "created_at": o.created_at,
        "updated_at": o.updated_at
    })
}

pub fn user_json(u: &User) -> Value {
    json!({
        "id": u.id,
        "handle": u.handle,
        "display_name": u.display_name,
        "created_at": u.created_at
    })
}

pub fn task_summary(t: &Task) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "difficulty": t.difficulty.as_str(),
        "score": t.score
    })
}

pub fn task_detail(t: &Task, assignees: &[User]) -> Value {
    json!({
        "id": t.id,
        "title": t.title,
        "description": t.description,
        "status": t.status.as_str(),
        "priority": t.priority.as_str(),
        "difficulty": t.difficulty.as_str(),
        "due_date": t.due_date,
        "score": t.score,
        "assignees": assignees.iter().map(|u| json!(u.handle)).collect::<Vec<_>>(),
        "created_at": t.created_at,
        "updated_at": t.updated_at,
        "completed_at": t.completed_at
    })
}

pub fn goal_json(g: &Goal) -> Value {
    json!({
        "id": g.id,
        "name": g.name,
        "description": g.description,
        "points": g.points,
        "due_date": g.due_date,
        "status": g.status.as_str(),
        "created_at": g.created_at,
        "updated_at": g.updated_at
    })
}

pub fn progress_json(p: &TaskProgress) -> Value {
    json!({
        "total": p.total,
        "backlog": p.backlog,
        "todo": p.todo,
        "in_progress": p.in_progress,
        "review": p.review,
        "done": p.done,
        "archived": p.archived,
        "canceled": p.canceled,
        "percentage": (p.percentage * 10.0).round() / 10.0
    })
}

pub fn leaderboard_json(entries: &[LeaderboardEntry]) -> Value {
    json!(entries
        .iter()
        .enumerate()
        .map(|(i, e)| json!({
            "rank": i + 1,
            "handle": e.handle,
            "user_id": e.user_id,
            "total_points": e.total_points
        }))
        .collect::<Vec<_>>())
}

pub fn transaction_json(tx: &PointTransaction) -> Value {
    json!({
        "id": tx.id,
        "task_id": tx.task_id,
        "type": tx.tx_type.as_str(),
        "points_change": tx.points_change,
        "previous_total": tx.previous_total,
        "new_total": tx.new_total,
        "metadata": serde_json::to_value(&tx.metadata).unwrap_or(Value::Null),
        "created_at": tx.created_at
    })
}
