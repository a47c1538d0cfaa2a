mod bandit;
mod cell;
mod half;
mod region;
mod variant;

pub use bandit::*;
pub use cell::*;
pub use half::*;
pub use region::*;
pub use variant::*;
