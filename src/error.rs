use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotInitialized,
    NoActiveOrg,
    OrgNotFound,
    OrgNameConflict,
    UserNotFound,
    HandleConflict,
    TaskNotFound,
    GoalNotFound,
    AmbiguousRef,
    InvalidStatusTransition,
    NoAssignees,
    GoalTasksIncomplete,
    GoalNotCompleted,
    ValidationError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::NoActiveOrg => "NO_ACTIVE_ORG",
            Self::OrgNotFound => "ORG_NOT_FOUND",
            Self::OrgNameConflict => "ORG_NAME_CONFLICT",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::HandleConflict => "HANDLE_CONFLICT",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::GoalNotFound => "GOAL_NOT_FOUND",
            Self::AmbiguousRef => "AMBIGUOUS_REF",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::NoAssignees => "NO_ASSIGNEES",
            Self::GoalTasksIncomplete => "GOAL_TASKS_INCOMPLETE",
            Self::GoalNotCompleted => "GOAL_NOT_COMPLETED",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskupError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskupError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_initialized() -> Self {
        Self::new(
            ErrorCode::NotInitialized,
            "taskup is not initialized. Run `taskup init` first.",
        )
    }

    pub fn no_active_org() -> Self {
        Self::new(
            ErrorCode::NoActiveOrg,
            "No active organization. Use `taskup org activate <name>` or `--org <name>`.",
        )
    }

    pub fn org_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::OrgNotFound,
            format!("Organization not found: {reference}"),
        )
    }

    pub fn org_name_conflict(name: &str) -> Self {
        Self::new(
            ErrorCode::OrgNameConflict,
            format!("Organization with name '{name}' already exists"),
        )
    }

    pub fn user_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::UserNotFound,
            format!("User not found: {reference}"),
        )
    }

    pub fn handle_conflict(handle: &str) -> Self {
        Self::new(
            ErrorCode::HandleConflict,
            format!("User with handle '{handle}' already exists in this organization"),
        )
    }

    pub fn task_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::TaskNotFound,
            format!("Task not found: {reference}"),
        )
    }

    pub fn goal_not_found(reference: &str) -> Self {
        Self::new(
            ErrorCode::GoalNotFound,
            format!("Goal not found: {reference}"),
        )
    }

    pub fn ambiguous_ref(reference: &str, candidates: &[String]) -> Self {
        Self::new(
            ErrorCode::AmbiguousRef,
            format!(
                "Ambiguous reference '{}'. Candidates: {}",
                reference,
                candidates.join(", ")
            ),
        )
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStatusTransition,
            format!("Invalid status transition: {from} → {to}"),
        )
    }

    pub fn no_assignees(reference: &str) -> Self {
        Self::new(
            ErrorCode::NoAssignees,
            format!("{reference} has no assignees to receive points"),
        )
    }

    pub fn goal_tasks_incomplete(goal_id: &str, remaining: i64) -> Self {
        Self::new(
            ErrorCode::GoalTasksIncomplete,
            format!("Goal {goal_id} has {remaining} linked task(s) not yet done"),
        )
    }

    pub fn goal_not_completed(goal_id: &str) -> Self {
        Self::new(
            ErrorCode::GoalNotCompleted,
            format!("Goal {goal_id} is not completed; nothing to revert"),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }
}

impl From<rusqlite::Error> for TaskupError {
    fn from(e: rusqlite::Error) -> Self {
        Self::database(e.to_string())
    }
}
