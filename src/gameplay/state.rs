use super::environment::Environment;
use crate::Reward;
use crate::hoo::Region;
use anyhow::Result;
use anyhow::ensure;

/// a planning state: an environment snapshot plus its cached action
/// region. simulate clones before stepping, so the caller's state is
/// unobservably unchanged no matter what the environment does to its
/// internals.
#[derive(Debug, Clone, PartialEq)]
pub struct State<E: Environment> {
    env: E,
    region: Region,
}

impl<E: Environment> From<E> for State<E> {
    fn from(env: E) -> Self {
        let region = env.region();
        Self { env, region }
    }
}

impl<E: Environment> State<E> {
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn observe(&self) -> Vec<f64> {
        self.env.observe()
    }

    /// imagine one action: returns the successor state, the reward,
    /// and the terminal flag. the contract checks live here so the
    /// environments stay plain: an action outside the declared region
    /// or a non-finite reward is a broken collaborator, not a
    /// recoverable condition.
    pub fn simulate(&self, action: &[f64]) -> Result<(Self, Reward, bool)> {
        ensure!(
            self.region.contains(action),
            "action {:?} lies outside the declared region {:?}",
            action,
            self.region,
        );
        let mut next = self.clone();
        let step = next.env.step(action);
        ensure!(
            step.reward.is_finite(),
            "environment produced a non-finite reward ({})",
            step.reward,
        );
        Ok((next, step.reward, step.done))
    }
}
