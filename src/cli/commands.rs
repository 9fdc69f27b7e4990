use clap::{Parser, Subcommand};

const VERSION: &str = env!("GIT_VERSION");

#[derive(Parser)]
#[command(
    name = "taskup",
    version = VERSION,
    about = "Team task and goal tracking with a points ledger",
    after_help = "\
NOTE:
  Requires a git repository. DB is stored at <git-root>/.taskup/taskup.db
  Run `taskup init` before any other command.

SCORING:
  Base score is 10 x difficulty (easy/medium/hard). On completion the base
  is scaled by a due-date curve between 0.5x (very late) and 2.0x (very
  early); on time pays 1.25x. Points are split evenly across assignees and
  recorded in an append-only ledger.

EXIT CODES:
  0  Success
  1  Error (DB, validation, invalid transition, etc.)

BEHAVIOR NOTES:
  Moving a task to `done` awards points; moving it back deducts them.
  Editing difficulty or due date on a done task adjusts by the delta.
  `archived`/`canceled` are terminal: nothing leaves those states.
  Goal completion requires every linked task done and >=1 goal assignee;
  `goal revert` appends counter-entries, it never rewrites the ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Specify organization by name or ID prefix
    #[arg(long, global = true)]
    pub org: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize taskup in this repository
    Init,

    /// Organization management
    #[command(subcommand)]
    Org(OrgCommands),

    /// User management
    #[command(subcommand)]
    User(UserCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Goal management
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Points ledger and leaderboard
    #[command(subcommand)]
    Points(PointsCommands),

    /// Show overall status for the organization
    Status,
}

#[derive(Subcommand)]
pub enum OrgCommands {
    /// Create a new organization
    Create {
        /// Organization name (slug: lowercase alphanumeric with hyphens)
        name: String,
        #[arg(long)]
        title: Option<String>,
    },
    /// List all organizations
    List,
    /// Show organization details
    Show {
        /// Organization name or ID prefix (defaults to the active org)
        reference: Option<String>,
    },
    /// Set active organization
    Activate {
        /// Organization name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user to the organization
    Add {
        /// User handle (unique within the organization)
        handle: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
    },
    /// List users in the organization
    List,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task
    Add {
        /// Task title
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high, urgent
        #[arg(long, default_value = "medium")]
        priority: String,
        /// easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Assign to user handle (repeatable)
        #[arg(long)]
        assign: Vec<String>,
    },
    /// List tasks
    List,
    /// Show task details
    Show {
        /// Task ID or prefix
        id: String,
    },
    /// Change task status (awards on entering done, deducts on leaving)
    Status {
        id: String,
        /// backlog, todo, in_progress, review, done, archived, canceled
        status: String,
    },
    /// Edit task properties (adjusts points while done)
    Set {
        id: String,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        /// Remove the due date
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },
    /// Assign a user to a task
    Assign {
        id: String,
        handle: String,
    },
    /// Remove a user from a task
    Unassign {
        id: String,
        handle: String,
    },
}

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Create a goal
    Create {
        /// Goal name
        name: String,
        /// Point reward distributed on completion
        #[arg(long)]
        points: i64,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// List goals
    List,
    /// Show goal details
    Show {
        /// Goal name or ID prefix
        reference: String,
    },
    /// Link a task to a goal
    Link {
        goal: String,
        task: String,
    },
    /// Unlink a task from a goal
    Unlink {
        goal: String,
        task: String,
    },
    /// Assign a user to a goal
    Assign {
        goal: String,
        handle: String,
    },
    /// Remove a user from a goal
    Unassign {
        goal: String,
        handle: String,
    },
    /// Complete a goal and distribute its reward
    Complete {
        reference: String,
    },
    /// Revert a goal completion (appends counter-entries)
    Revert {
        reference: String,
    },
}

#[derive(Subcommand)]
pub enum PointsCommands {
    /// Show the organization leaderboard
    Leaderboard {
        #[arg(long, default_value = "10")]
        limit: i64,
    },
    /// Show a user's transaction history, newest first
    History {
        /// User handle
        handle: String,
    },
}
