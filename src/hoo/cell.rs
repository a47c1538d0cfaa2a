use super::region::Region;
use crate::Reward;
use rand::Rng;
use rand::rngs::SmallRng;

/// per-node bookkeeping of the partition tree. fresh cells are
/// optimistic: U and B start at infinity, so untried regions win the
/// descent until they collect their first visit. the split axis is
/// drawn once at construction and reused if the cell ever expands.
#[derive(Debug, Clone)]
pub struct Cell {
    depth: usize,
    axis: usize,
    region: Region,
    visits: usize,
    reward: Reward,
    upper: f64,
    bound: f64,
    dirty: bool,
}

impl Cell {
    pub fn new(region: Region, depth: usize, rng: &mut SmallRng) -> Self {
        let axis = rng.random_range(0..region.dim());
        Self {
            depth,
            axis,
            region,
            visits: 0,
            reward: 0.,
            upper: f64::INFINITY,
            bound: f64::INFINITY,
            dirty: false,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
    pub fn axis(&self) -> usize {
        self.axis
    }
    pub fn region(&self) -> &Region {
        &self.region
    }
    pub fn visits(&self) -> usize {
        self.visits
    }
    pub fn reward(&self) -> Reward {
        self.reward
    }
    pub fn upper(&self) -> f64 {
        self.upper
    }
    pub fn bound(&self) -> f64 {
        self.bound
    }
    pub fn average(&self) -> f64 {
        match self.visits {
            0 => f64::NEG_INFINITY,
            n => self.reward / n as f64,
        }
    }

    /// credit one visit with its observed reward
    pub fn visit(&mut self, reward: Reward) {
        self.visits += 1;
        self.reward += reward;
    }
    pub fn set_upper(&mut self, upper: f64) {
        self.upper = upper;
    }
    pub fn set_bound(&mut self, bound: f64) {
        self.bound = bound;
    }

    /// dirty flag for the B sweep: mark on the U pass, clear when the
    /// bound has been recomputed, so no cell settles twice per refresh
    pub fn mark(&mut self) {
        self.dirty = true;
    }
    pub fn marked(&self) -> bool {
        self.dirty
    }
    pub fn clear(&mut self) {
        self.dirty = false;
    }
}
