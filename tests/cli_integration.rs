use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        std::process::Command::new("git")
            .args(["init"])
            .current_dir(dir.path())
            .output()
            .expect("git init");
        Self { dir }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskup").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    /// A user's running total per the ledger.
    fn total_points(&self, handle: &str) -> i64 {
        let v = self.run_ok(&["points", "history", handle]);
        v["data"]["total_points"].as_i64().unwrap()
    }
}

/// init + one org + two users.
fn setup(env: &TestEnv) {
    env.run_ok(&["init"]);
    env.run_ok(&["org", "create", "acme", "--title", "Acme Inc"]);
    env.run_ok(&["user", "add", "alice"]);
    env.run_ok(&["user", "add", "bob"]);
}

fn add_task(env: &TestEnv, title: &str, extra: &[&str]) -> String {
    let mut args = vec!["task", "add", title];
    args.extend_from_slice(extra);
    let v = env.run_ok(&args);
    v["data"]["task"]["id"].as_str().unwrap().to_string()
}

fn add_goal(env: &TestEnv, name: &str, points: &str) -> String {
    let v = env.run_ok(&["goal", "create", name, "--points", points]);
    v["data"]["goal"]["id"].as_str().unwrap().to_string()
}

/// Due date string offset from today in whole days.
fn due_in(days: i64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(days)).to_string()
}

// ─── 1. init ───────────────────────────────────────────────────────

#[test]
fn test_init() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    let path = v["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".taskup/taskup.db"));
    assert!(std::path::PathBuf::from(path).exists());
}

#[test]
fn test_init_idempotent() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().contains("taskup.db"));
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["org", "list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
}

// ─── 2. org ────────────────────────────────────────────────────────

#[test]
fn test_org_create_list_activate() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["org", "create", "acme"]);
    env.run_ok(&["org", "create", "globex"]);

    let v = env.run_ok(&["org", "list"]);
    let orgs = v["data"]["organizations"].as_array().unwrap();
    assert_eq!(orgs.len(), 2);
    // First org auto-activated
    assert_eq!(orgs[0]["name"], "acme");
    assert_eq!(orgs[0]["active"], true);

    env.run_ok(&["org", "activate", "globex"]);
    let v = env.run_ok(&["org", "show"]);
    assert_eq!(v["data"]["name"], "globex");
}

#[test]
fn test_org_name_conflict() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["org", "create", "acme"]);
    let v = env.run_err(&["org", "create", "acme"]);
    assert_eq!(v["error"]["code"], "ORG_NAME_CONFLICT");
}

#[test]
fn test_org_name_validation() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["org", "create", "Bad Name"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_no_active_org() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    let v = env.run_err(&["task", "list"]);
    assert_eq!(v["error"]["code"], "NO_ACTIVE_ORG");
}

#[test]
fn test_org_flag_overrides_active() {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env.run_ok(&["org", "create", "acme"]);
    env.run_ok(&["org", "create", "globex"]);
    env.run_ok(&["--org", "globex", "user", "add", "carol"]);

    let v = env.run_ok(&["user", "list"]); // active org is acme
    assert_eq!(v["data"]["users"].as_array().unwrap().len(), 0);
    let v = env.run_ok(&["--org", "globex", "user", "list"]);
    assert_eq!(v["data"]["users"].as_array().unwrap().len(), 1);
}

// ─── 3. users ──────────────────────────────────────────────────────

#[test]
fn test_user_add_and_conflict() {
    let env = TestEnv::new();
    setup(&env);
    let v = env.run_err(&["user", "add", "alice"]);
    assert_eq!(v["error"]["code"], "HANDLE_CONFLICT");

    let v = env.run_ok(&["user", "list"]);
    let users = v["data"]["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["handle"], "alice");
}

#[test]
fn test_user_not_found() {
    let env = TestEnv::new();
    setup(&env);
    let v = env.run_err(&["points", "history", "nobody"]);
    assert_eq!(v["error"]["code"], "USER_NOT_FOUND");
}

// ─── 4. tasks ──────────────────────────────────────────────────────

#[test]
fn test_task_add_defaults() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Write docs", &[]);

    let v = env.run_ok(&["task", "show", &id]);
    let t = &v["data"]["task"];
    assert_eq!(t["status"], "backlog");
    assert_eq!(t["priority"], "medium");
    assert_eq!(t["difficulty"], "medium");
    // base score: 10 x difficulty weight
    assert_eq!(t["score"], 20);
}

#[test]
fn test_task_base_score_by_difficulty() {
    let env = TestEnv::new();
    setup(&env);
    let easy = add_task(&env, "Easy", &["--difficulty", "easy"]);
    let hard = add_task(&env, "Hard", &["--difficulty", "hard"]);

    let v = env.run_ok(&["task", "show", &easy]);
    assert_eq!(v["data"]["task"]["score"], 10);
    let v = env.run_ok(&["task", "show", &hard]);
    assert_eq!(v["data"]["task"]["score"], 30);
}

#[test]
fn test_task_show_by_prefix() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Prefixed", &[]);
    let v = env.run_ok(&["task", "show", &id[..10]]);
    assert_eq!(v["data"]["task"]["id"], id.as_str());
}

#[test]
fn test_task_invalid_inputs() {
    let env = TestEnv::new();
    setup(&env);
    let v = env.run_err(&["task", "add", "T", "--priority", "asap"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_err(&["task", "add", "T", "--difficulty", "brutal"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_err(&["task", "add", "T", "--due", "tomorrow"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
    let v = env.run_err(&["task", "show", "nosuchtask"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
}

#[test]
fn test_task_terminal_states_immutable() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Doomed", &[]);
    env.run_ok(&["task", "status", &id, "canceled"]);

    let v = env.run_err(&["task", "status", &id, "todo"]);
    assert_eq!(v["error"]["code"], "INVALID_STATUS_TRANSITION");
    let v = env.run_err(&["task", "set", &id, "--difficulty", "hard"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_task_same_status_rejected() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Stuck", &[]);
    let v = env.run_err(&["task", "status", &id, "backlog"]);
    assert_eq!(v["error"]["code"], "INVALID_STATUS_TRANSITION");
}

// ─── 5. award / deduct ─────────────────────────────────────────────

#[test]
fn test_done_awards_points_split_evenly() {
    let env = TestEnv::new();
    setup(&env);
    // medium = 20 base, no due date, two assignees: 10 each
    let id = add_task(&env, "Shared", &["--assign", "alice", "--assign", "bob"]);
    let v = env.run_ok(&["task", "status", &id, "done"]);
    assert_eq!(v["data"]["points"]["per_assignee"], 10);
    assert_eq!(v["data"]["points"]["recipients"], 2);

    assert_eq!(env.total_points("alice"), 10);
    assert_eq!(env.total_points("bob"), 10);
}

#[test]
fn test_undone_deducts_points() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Flaky", &["--assign", "alice"]);
    env.run_ok(&["task", "status", &id, "done"]);
    assert_eq!(env.total_points("alice"), 20);

    let v = env.run_ok(&["task", "status", &id, "in_progress"]);
    assert_eq!(v["data"]["points"]["per_assignee"], -20);
    assert_eq!(env.total_points("alice"), 0);

    // score back at base
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 20);
}

#[test]
fn test_award_deduct_round_trip_with_rounding() {
    let env = TestEnv::new();
    setup(&env);
    env.run_ok(&["user", "add", "carol"]);
    // easy = 10, three assignees: round(10/3) = 3 each, both directions
    let id = add_task(
        &env,
        "Uneven",
        &["--difficulty", "easy", "--assign", "alice", "--assign", "bob", "--assign", "carol"],
    );
    env.run_ok(&["task", "status", &id, "done"]);
    assert_eq!(env.total_points("alice"), 3);
    env.run_ok(&["task", "status", &id, "todo"]);
    assert_eq!(env.total_points("alice"), 0);
    assert_eq!(env.total_points("bob"), 0);
    assert_eq!(env.total_points("carol"), 0);
}

#[test]
fn test_done_with_no_assignees_warns() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Orphan", &[]);
    let v = env.run_ok(&["task", "status", &id, "done"]);
    assert!(v["warning"].as_str().unwrap().contains("no assignees"));
    assert_eq!(v["data"]["points"]["recipients"], 0);
}

// ─── 6. due-date multiplier through the CLI ────────────────────────

#[test]
fn test_score_due_today() {
    let env = TestEnv::new();
    setup(&env);
    // base 20 x 1.25 on-time = 25
    let id = add_task(&env, "On time", &["--assign", "alice", "--due", &due_in(0)]);
    env.run_ok(&["task", "status", &id, "done"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 25);
    assert_eq!(env.total_points("alice"), 25);
}

#[test]
fn test_score_one_day_late() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Late", &["--assign", "alice", "--due", &due_in(-1)]);
    env.run_ok(&["task", "status", &id, "done"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 23);
}

#[test]
fn test_score_seven_days_early() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Early", &["--assign", "alice", "--due", &due_in(7)]);
    env.run_ok(&["task", "status", &id, "done"]);
    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 37);
}

// ─── 7. property adjustments ───────────────────────────────────────

#[test]
fn test_difficulty_change_while_done_adjusts() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Growing", &["--assign", "alice"]);
    env.run_ok(&["task", "status", &id, "done"]);
    assert_eq!(env.total_points("alice"), 20);

    // medium 20 -> hard 30, delta +10 for the single assignee
    let v = env.run_ok(&["task", "set", &id, "--difficulty", "hard"]);
    assert_eq!(v["data"]["adjustment"]["per_assignee"], 10);
    assert_eq!(env.total_points("alice"), 30);

    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 30);
}

#[test]
fn test_priority_change_writes_no_transaction() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Urgentish", &["--assign", "alice"]);
    env.run_ok(&["task", "status", &id, "done"]);

    env.run_ok(&["task", "set", &id, "--priority", "urgent"]);
    let v = env.run_ok(&["points", "history", "alice"]);
    // only the award transaction exists
    assert_eq!(v["data"]["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(env.total_points("alice"), 20);
}

#[test]
fn test_property_change_before_done_has_no_ledger_effect() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Not yet", &["--assign", "alice"]);
    env.run_ok(&["task", "set", &id, "--difficulty", "hard"]);

    let v = env.run_ok(&["task", "show", &id]);
    assert_eq!(v["data"]["task"]["score"], 30); // base kept in step
    let v = env.run_ok(&["points", "history", "alice"]);
    assert_eq!(v["data"]["transactions"].as_array().unwrap().len(), 0);
}

#[test]
fn test_due_date_change_while_done_adjusts() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Rescheduled", &["--assign", "alice"]);
    env.run_ok(&["task", "status", &id, "done"]);
    assert_eq!(env.total_points("alice"), 20);

    // adding a due date seven days out reprices 20 -> 37
    let v = env.run_ok(&["task", "set", &id, "--due", &due_in(7)]);
    assert_eq!(v["data"]["adjustment"]["per_assignee"], 17);
    assert_eq!(env.total_points("alice"), 37);

    // clearing it reprices back to base
    env.run_ok(&["task", "set", &id, "--clear-due"]);
    assert_eq!(env.total_points("alice"), 20);
}

// ─── 8. ledger invariants ──────────────────────────────────────────

#[test]
fn test_transaction_chain_is_consistent() {
    let env = TestEnv::new();
    setup(&env);
    let a = add_task(&env, "One", &["--assign", "alice"]);
    let b = add_task(&env, "Two", &["--difficulty", "hard", "--assign", "alice"]);
    env.run_ok(&["task", "status", &a, "done"]);
    env.run_ok(&["task", "status", &b, "done"]);
    env.run_ok(&["task", "status", &a, "todo"]);

    let v = env.run_ok(&["points", "history", "alice"]);
    let txs = v["data"]["transactions"].as_array().unwrap();
    assert_eq!(txs.len(), 3);
    for tx in txs {
        assert_eq!(
            tx["new_total"].as_i64().unwrap() - tx["previous_total"].as_i64().unwrap(),
            tx["points_change"].as_i64().unwrap()
        );
    }
    // newest first; stored total equals latest new_total
    assert_eq!(v["data"]["total_points"], txs[0]["new_total"]);
    assert_eq!(env.total_points("alice"), 30);
}

#[test]
fn test_transaction_metadata_is_structured() {
    let env = TestEnv::new();
    setup(&env);
    let id = add_task(&env, "Traced", &["--assign", "alice"]);
    env.run_ok(&["task", "status", &id, "done"]);
    env.run_ok(&["task", "set", &id, "--difficulty", "hard"]);

    let v = env.run_ok(&["points", "history", "alice"]);
    let txs = v["data"]["transactions"].as_array().unwrap();
    // newest first: the adjustment, then the award
    assert_eq!(txs[0]["metadata"]["event"], "property_changed");
    assert_eq!(txs[0]["metadata"]["property"], "difficulty");
    assert_eq!(txs[0]["metadata"]["old_value"], "medium");
    assert_eq!(txs[0]["metadata"]["new_value"], "hard");
    assert_eq!(txs[1]["metadata"]["event"], "task_completed");
    assert_eq!(txs[1]["metadata"]["task_title"], "Traced");
}

// ─── 9. goals ──────────────────────────────────────────────────────

/// Two tasks, both assigned to both users, goal reward 100: 50 each.
fn goal_fixture(env: &TestEnv) -> (String, String, String) {
    let t1 = add_task(env, "G1", &["--difficulty", "easy", "--assign", "alice", "--assign", "bob"]);
    let t2 = add_task(env, "G2", &["--difficulty", "easy", "--assign", "alice", "--assign", "bob"]);
    let g = add_goal(env, "ship-it", "100");
    env.run_ok(&["goal", "link", "ship-it", &t1]);
    env.run_ok(&["goal", "link", "ship-it", &t2]);
    env.run_ok(&["goal", "assign", "ship-it", "alice"]);
    env.run_ok(&["goal", "assign", "ship-it", "bob"]);
    (g, t1, t2)
}

#[test]
fn test_goal_complete_requires_done_tasks() {
    let env = TestEnv::new();
    setup(&env);
    let (_, t1, _) = goal_fixture(&env);
    let v = env.run_err(&["goal", "complete", "ship-it"]);
    assert_eq!(v["error"]["code"], "GOAL_TASKS_INCOMPLETE");

    env.run_ok(&["task", "status", &t1, "done"]);
    let v = env.run_err(&["goal", "complete", "ship-it"]);
    assert_eq!(v["error"]["code"], "GOAL_TASKS_INCOMPLETE");
}

#[test]
fn test_goal_complete_requires_assignees() {
    let env = TestEnv::new();
    setup(&env);
    let t = add_task(&env, "Solo", &["--assign", "alice"]);
    add_goal(&env, "lonely", "50");
    env.run_ok(&["goal", "link", "lonely", &t]);
    env.run_ok(&["task", "status", &t, "done"]);
    let v = env.run_err(&["goal", "complete", "lonely"]);
    assert_eq!(v["error"]["code"], "NO_ASSIGNEES");
}

#[test]
fn test_goal_complete_distributes_reward() {
    let env = TestEnv::new();
    setup(&env);
    let (_, t1, t2) = goal_fixture(&env);
    env.run_ok(&["task", "status", &t1, "done"]);
    env.run_ok(&["task", "status", &t2, "done"]);
    // each task awarded round(10/2)=5 per user -> 10 each so far
    assert_eq!(env.total_points("alice"), 10);

    let v = env.run_ok(&["goal", "complete", "ship-it"]);
    assert_eq!(v["data"]["points_distributed"], 100);
    let recipients = v["data"]["recipients"].as_array().unwrap();
    assert_eq!(recipients.len(), 2);
    for r in recipients {
        assert_eq!(r["points"], 50);
    }
    assert_eq!(env.total_points("alice"), 60);
    assert_eq!(env.total_points("bob"), 60);

    let v = env.run_ok(&["goal", "show", "ship-it"]);
    assert_eq!(v["data"]["goal"]["status"], "completed");
}

#[test]
fn test_goal_complete_twice_rejected() {
    let env = TestEnv::new();
    setup(&env);
    let (_, t1, t2) = goal_fixture(&env);
    env.run_ok(&["task", "status", &t1, "done"]);
    env.run_ok(&["task", "status", &t2, "done"]);
    env.run_ok(&["goal", "complete", "ship-it"]);
    let v = env.run_err(&["goal", "complete", "ship-it"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_goal_revert_restores_totals() {
    let env = TestEnv::new();
    setup(&env);
    let (_, t1, t2) = goal_fixture(&env);
    env.run_ok(&["task", "status", &t1, "done"]);
    env.run_ok(&["task", "status", &t2, "done"]);
    env.run_ok(&["goal", "complete", "ship-it"]);
    assert_eq!(env.total_points("alice"), 60);

    let v = env.run_ok(&["goal", "revert", "ship-it"]);
    assert_eq!(v["data"]["transactions_reverted"], 2);
    assert_eq!(v["data"]["points_reclaimed"], 100);
    assert_eq!(env.total_points("alice"), 10);
    assert_eq!(env.total_points("bob"), 10);

    let v = env.run_ok(&["goal", "show", "ship-it"]);
    assert_eq!(v["data"]["goal"]["status"], "active");
}

#[test]
fn test_goal_revert_requires_completed() {
    let env = TestEnv::new();
    setup(&env);
    goal_fixture(&env);
    let v = env.run_err(&["goal", "revert", "ship-it"]);
    assert_eq!(v["error"]["code"], "GOAL_NOT_COMPLETED");
}

#[test]
fn test_goal_complete_revert_cycle_is_stable() {
    let env = TestEnv::new();
    setup(&env);
    let (_, t1, t2) = goal_fixture(&env);
    env.run_ok(&["task", "status", &t1, "done"]);
    env.run_ok(&["task", "status", &t2, "done"]);

    env.run_ok(&["goal", "complete", "ship-it"]);
    env.run_ok(&["goal", "revert", "ship-it"]);
    env.run_ok(&["goal", "complete", "ship-it"]);
    assert_eq!(env.total_points("alice"), 60);

    // second revert only negates the second completion's rows
    let v = env.run_ok(&["goal", "revert", "ship-it"]);
    assert_eq!(v["data"]["transactions_reverted"], 2);
    assert_eq!(env.total_points("alice"), 10);
}

#[test]
fn test_goal_attribution_respects_intersection() {
    let env = TestEnv::new();
    setup(&env);
    // bob works the task but is not a goal assignee: alice gets the reward
    let t = add_task(&env, "Mixed", &["--difficulty", "easy", "--assign", "alice", "--assign", "bob"]);
    add_goal(&env, "narrow", "40");
    env.run_ok(&["goal", "link", "narrow", &t]);
    env.run_ok(&["goal", "assign", "narrow", "alice"]);
    env.run_ok(&["task", "status", &t, "done"]);

    let v = env.run_ok(&["goal", "complete", "narrow"]);
    assert_eq!(v["data"]["points_distributed"], 40);
    let recipients = v["data"]["recipients"].as_array().unwrap();
    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0]["handle"], "alice");
}

// ─── 10. leaderboard / status ──────────────────────────────────────

#[test]
fn test_leaderboard_ordering() {
    let env = TestEnv::new();
    setup(&env);
    let a = add_task(&env, "Small", &["--difficulty", "easy", "--assign", "bob"]);
    let b = add_task(&env, "Big", &["--difficulty", "hard", "--assign", "alice"]);
    env.run_ok(&["task", "status", &a, "done"]);
    env.run_ok(&["task", "status", &b, "done"]);

    let v = env.run_ok(&["points", "leaderboard"]);
    let entries = v["data"]["leaderboard"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["handle"], "alice");
    assert_eq!(entries[0]["total_points"], 30);
    assert_eq!(entries[0]["rank"], 1);
    assert_eq!(entries[1]["handle"], "bob");
    assert_eq!(entries[1]["total_points"], 10);
}

#[test]
fn test_status_overview() {
    let env = TestEnv::new();
    setup(&env);
    let a = add_task(&env, "A", &["--assign", "alice"]);
    add_task(&env, "B", &[]);
    env.run_ok(&["task", "status", &a, "done"]);
    add_goal(&env, "q3", "10");

    let v = env.run_ok(&["status"]);
    assert_eq!(v["data"]["organization"]["name"], "acme");
    assert_eq!(v["data"]["progress"]["total"], 2);
    assert_eq!(v["data"]["progress"]["done"], 1);
    assert_eq!(v["data"]["progress"]["percentage"], 50.0);
    assert_eq!(v["data"]["goals"].as_array().unwrap().len(), 1);
    assert_eq!(v["data"]["leaderboard"][0]["handle"], "alice");
}

// ─── 11. text output smoke ─────────────────────────────────────────

#[test]
fn test_text_output() {
    let env = TestEnv::new();
    setup(&env);
    add_task(&env, "Visible", &[]);
    env.cmd()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visible"));
    env.cmd()
        .args(["points", "leaderboard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No points recorded yet."));
}
