use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub org_id: String,
    pub handle: String,
    pub display_name: Option<String>,
    pub created_at: String,
}
