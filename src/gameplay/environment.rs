use crate::Reward;
use crate::hoo::Region;

/// the outcome of advancing an environment by one action
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub reward: Reward,
    pub done: bool,
}

/// the capability set the planner consumes. implementations keep
/// their whole mutable state in plain numbers so that Clone is a
/// faithful snapshot: stepping the copy never leaks into the
/// original. nothing else is assumed, no observation structure, no
/// goal structure.
pub trait Environment: Clone {
    /// the box of legal actions; stable for the lifetime of the value
    fn region(&self) -> Region;

    /// advance the internal state by one action
    fn step(&mut self, action: &[f64]) -> Step;

    /// opaque observation vector, for trace logging only
    fn observe(&self) -> Vec<f64>;
}
