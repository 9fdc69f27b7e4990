pub mod multiplier;
pub mod calculator;

pub use multiplier::*;
pub use calculator::*;
