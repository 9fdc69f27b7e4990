pub mod org;
pub mod user;
pub mod task;
pub mod goal;
pub mod points;

pub use org::*;
pub use user::*;
pub use task::*;
pub use goal::*;
pub use points::*;
