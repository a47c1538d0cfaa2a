use crate::Action;
use crate::Reward;
use crate::gameplay::Environment;
use crate::gameplay::State;
use crate::hoo::Hoo;
use crate::hoo::Mode;
use crate::hoo::Tuning;
use crate::hoo::Walk;
use anyhow::Result;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;

/// stable text form of a cell center. bisection centers are dyadic
/// rationals, so the shortest round-trip rendering of each coordinate
/// separates any two distinct centers exactly.
pub(crate) fn key(center: &[f64]) -> String {
    format!("{center:?}")
}

/// discount-weighted mean of a reward tail. dividing the discounted
/// sum by the discounted weight keeps the target inside the hull of
/// the raw rewards, the bounded range the confidence bounds assume.
pub(crate) fn normalize(tail: &[Reward], gamma: f64) -> Reward {
    debug_assert!(!tail.is_empty());
    let mut ret = 0.;
    let mut weight = 0.;
    let mut discount = 1.;
    for r in tail {
        ret += discount * r;
        weight += discount;
        discount *= gamma;
    }
    ret / weight
}

/// one reached planning state of the outer decision tree. owns a
/// bandit over the local action region and memoizes the successor
/// reached through each chosen cell, keyed by the cell's center; the
/// reward and terminal flag of the first simulation through a key are
/// stored on the successor and reused ever after.
pub struct Node<E: Environment> {
    state: State<E>,
    depth: usize,
    gamma: f64,
    tuning: Tuning,
    bandit: Hoo,
    children: BTreeMap<String, Node<E>>,
    reward: Option<Reward>,
    done: bool,
    action: Option<Action>,
}

impl<E: Environment> Node<E> {
    pub fn root(state: State<E>, gamma: f64, tuning: Tuning, rng: &mut SmallRng) -> Self {
        let bandit = Hoo::new(state.region().clone(), tuning, rng);
        Self {
            state,
            depth: 0,
            gamma,
            tuning,
            bandit,
            children: BTreeMap::new(),
            reward: None,
            done: false,
            action: None,
        }
    }

    fn sprout(
        &self,
        state: State<E>,
        reward: Reward,
        done: bool,
        action: Action,
        rng: &mut SmallRng,
    ) -> Self {
        let bandit = Hoo::new(state.region().clone(), self.tuning, rng);
        Self {
            state,
            depth: self.depth + 1,
            gamma: self.gamma,
            tuning: self.tuning,
            bandit,
            children: BTreeMap::new(),
            reward: Some(reward),
            done,
            action: Some(action),
        }
    }

    pub fn state(&self) -> &State<E> {
        &self.state
    }
    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn reward(&self) -> Option<Reward> {
        self.reward
    }
    pub fn done(&self) -> bool {
        self.done
    }
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }
    pub fn bandit(&self) -> &Hoo {
        &self.bandit
    }
    pub fn children(&self) -> &BTreeMap<String, Node<E>> {
        &self.children
    }

    /// one planning step: let the bandit pick a cell, form the action,
    /// and reuse the memoized successor when this cell's center was
    /// already simulated from here
    pub fn select_action(&mut self, mode: Mode, rng: &mut SmallRng) -> Result<(String, Reward, bool)> {
        let leaf = self.bandit.generate_path(rng);
        let action = self.bandit.sample_point(leaf, mode, rng);
        let ref index = key(&self.bandit.center(leaf));
        if !self.children.contains_key(index) {
            let (next, reward, done) = self.state.simulate(&action)?;
            let child = self.sprout(next, reward, done, action, rng);
            self.children.insert(index.clone(), child);
        }
        let child = self.children.get(index).expect("memoized directly above");
        Ok((
            index.clone(),
            child.reward.expect("only the root lacks an arrival reward"),
            child.done,
        ))
    }

    /// grow a standalone successor by simulating a literal action,
    /// for commits that bypass the memo (sampled actions rarely land
    /// on a cell center)
    pub(crate) fn branch(&self, action: &[f64], rng: &mut SmallRng) -> Result<Node<E>> {
        let (next, reward, done) = self.state.simulate(action)?;
        Ok(self.sprout(next, reward, done, action.to_vec(), rng))
    }

    /// rollout from this node: descend up to `remaining` further
    /// steps, then feed every bandit on the unwind its normalized
    /// discounted tail. once a terminal step is observed the buffer is
    /// padded with the last reward to the horizon, and a single zero
    /// sentinel closes it either way.
    pub(crate) fn explore(
        &mut self,
        remaining: usize,
        horizon: usize,
        t: usize,
        mode: Mode,
        rng: &mut SmallRng,
        rewards: &mut Vec<Reward>,
    ) -> Result<()> {
        if remaining == 0 {
            rewards.push(0.);
        } else {
            let (index, reward, done) = self.select_action(mode, rng)?;
            rewards.push(reward);
            let child = self.children.get_mut(&index).expect("selected child exists");
            if done {
                while rewards.len() < horizon {
                    rewards.push(reward);
                }
                rewards.push(0.);
                child.absorb(rewards, t);
            } else {
                child.explore(remaining - 1, horizon, t, mode, rng, rewards)?;
            }
        }
        self.absorb(rewards, t);
        Ok(())
    }

    fn absorb(&mut self, rewards: &[Reward], t: usize) {
        self.bandit
            .observe(normalize(&rewards[self.depth..], self.gamma), t);
    }

    pub fn best_action(&self, mode: Mode, walk: Walk, rng: &mut SmallRng) -> Action {
        self.bandit.best_action(mode, walk, rng)
    }

    /// hand over the successor stored under a key, if any
    pub(crate) fn release(&mut self, index: &str) -> Option<Node<E>> {
        self.children.remove(index)
    }

    /// re-root a committed subtree: this node becomes depth zero and
    /// the whole owned subtree recomputes its depths below it
    pub fn reset(&mut self) {
        self.rebase(0);
    }

    fn rebase(&mut self, depth: usize) {
        self.depth = depth;
        for child in self.children.values_mut() {
            child.rebase(depth + 1);
        }
    }
}
