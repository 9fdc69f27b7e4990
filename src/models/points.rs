use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    TaskCompleted,
    TaskUncompleted,
    TaskPropertyChanged,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskCompleted => "task_completed",
            Self::TaskUncompleted => "task_uncompleted",
            Self::TaskPropertyChanged => "task_property_changed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "task_completed" => Some(Self::TaskCompleted),
            "task_uncompleted" => Some(Self::TaskUncompleted),
            "task_property_changed" => Some(Self::TaskPropertyChanged),
            _ => None,
        }
    }
}

/// Structured context stored with each ledger row. One variant per cause,
/// so goal-related rows can be found again without guessing at blob shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TransactionMeta {
    TaskCompleted {
        task_title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        goal_id: Option<String>,
    },
    TaskUncompleted {
        task_title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        goal_id: Option<String>,
        /// Id of the transaction this row negates (set on goal revert).
        #[serde(skip_serializing_if = "Option::is_none")]
        reverts: Option<String>,
    },
    PropertyChanged {
        task_title: String,
        property: String,
        old_value: String,
        new_value: String,
    },
}

impl TransactionMeta {
    pub fn goal_id(&self) -> Option<&str> {
        match self {
            Self::TaskCompleted { goal_id, .. } | Self::TaskUncompleted { goal_id, .. } => {
                goal_id.as_deref()
            }
            Self::PropertyChanged { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPoints {
    pub user_id: String,
    pub org_id: String,
    pub total_points: i64,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointTransaction {
    pub id: String,
    pub user_id: String,
    pub org_id: String,
    pub task_id: Option<String>,
    pub tx_type: TransactionType,
    pub points_change: i64,
    pub previous_total: i64,
    pub new_total: i64,
    pub metadata: TransactionMeta,
    pub created_at: String,
}
