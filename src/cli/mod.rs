pub mod commands;
pub mod init;
pub mod org;
pub mod user;
pub mod task;
pub mod goal;
pub mod points;
pub mod status;

pub use commands::*;
