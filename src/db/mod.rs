pub mod connection;
pub mod migrations;
pub mod org_repo;
pub mod user_repo;
pub mod task_repo;
pub mod goal_repo;
pub mod points_repo;

pub use connection::*;
