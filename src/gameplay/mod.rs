mod acrobot;
mod cartpole;
mod environment;
mod function;
mod mountain;
mod pendulum;
mod state;
mod world;

pub use acrobot::*;
pub use cartpole::*;
pub use environment::*;
pub use function::*;
pub use mountain::*;
pub use pendulum::*;
pub use state::*;
pub use world::*;
