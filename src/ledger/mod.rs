pub mod task_points;
pub mod goal_points;
