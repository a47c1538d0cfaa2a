use super::node::Node;
use super::node::key;
use crate::Action;
use crate::Reward;
use crate::gameplay::Environment;
use crate::gameplay::State;
use crate::hoo::Mode;
use crate::hoo::Tuning;
use crate::hoo::Walk;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// what to do when a simulation fails mid-trajectory: abandon the run
/// or abandon just that iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Raise,
    Swallow,
}

/// the outer driver: runs trajectories of bounded depth from the root
/// decision node, feeds discounted returns back into the per-node
/// bandits, and commits one action at a time.
pub struct Planner<E: Environment> {
    root: Node<E>,
    horizon: usize,
    seed: Option<u64>,
    failure: Failure,
    walk: Walk,
}

impl<E: Environment> Planner<E> {
    pub fn new(
        state: State<E>,
        horizon: usize,
        gamma: f64,
        tuning: Tuning,
        rng: &mut SmallRng,
    ) -> Self {
        Self {
            root: Node::root(state, gamma, tuning, rng),
            horizon,
            seed: None,
            failure: Failure::Raise,
            walk: Walk::Tolerant,
        }
    }

    /// reseed the generator to this value at the start of every
    /// planning iteration, pinning repeated runs from a fixed state
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }
    pub fn with_walk(mut self, walk: Walk) -> Self {
        self.walk = walk;
        self
    }

    pub fn root(&self) -> &Node<E> {
        &self.root
    }
    pub fn observe(&self) -> Vec<f64> {
        self.root.state().observe()
    }

    /// run n planning iterations from the current root, then
    /// recommend an action. an abandoned trajectory still consumes
    /// its iteration; nothing of its partial buffer is kept.
    pub fn run(&mut self, n: usize, mode: Mode, rng: &mut SmallRng) -> Result<Action> {
        for t in 1..=n {
            if let Some(seed) = self.seed {
                *rng = SmallRng::seed_from_u64(seed);
            }
            let mut rewards = Vec::with_capacity(self.horizon + 1);
            match self
                .root
                .explore(self.horizon, self.horizon, t, mode, rng, &mut rewards)
            {
                Ok(()) => {}
                Err(e) => match self.failure {
                    Failure::Raise => return Err(e),
                    Failure::Swallow => log::warn!("iteration {} abandoned: {:#}", t, e),
                },
            }
        }
        Ok(self.root.best_action(mode, self.walk, rng))
    }

    /// commit an action: the memoized successor keyed by the action
    /// becomes the new root, keeping its accumulated subtree, and the
    /// rest of the old tree drops. a sampled action that matches no
    /// cell center advances through a fresh simulation instead.
    pub fn advance(&mut self, action: &[f64], rng: &mut SmallRng) -> Result<(Reward, bool)> {
        let mut next = match self.root.release(&key(action)) {
            Some(next) => next,
            None => self.root.branch(action, rng)?,
        };
        next.reset();
        let reward = next.reward().expect("committed nodes carry their arrival");
        let done = next.done();
        self.root = next;
        Ok((reward, done))
    }
}
