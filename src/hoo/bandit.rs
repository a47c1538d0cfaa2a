use super::cell::Cell;
use super::half::Half;
use super::region::Region;
use super::variant::Scope;
use super::variant::Tuning;
use super::variant::Variant;
use crate::Action;
use crate::Reward;
use petgraph::Direction::Outgoing;
use petgraph::graph::DiGraph;
use petgraph::graph::NodeIndex;
use rand::rngs::SmallRng;
use rand::seq::IndexedRandom;

/// how an action is drawn from a chosen cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// a fresh uniform sample inside the cell
    Sample,
    /// the cell midpoint
    Center,
}

/// tie handling of the exploitation walk in best_action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    /// descend whenever the best child matches the incumbent
    Tolerant,
    /// descend only on strict improvement
    Strict,
}

/// one visited cell of the partition tree, for logs and tests
#[derive(Debug, Clone)]
pub struct Survey {
    pub center: Action,
    pub depth: usize,
    pub visits: usize,
    pub reward: Reward,
    pub upper: f64,
    pub bound: f64,
}

/// hierarchical optimistic optimization over a single decision.
/// the partition tree lives in a DiGraph whose edges point from a
/// cell to its two halves; parents are reachable through Incoming
/// edges, so upward traversal never needs an owning back-reference.
pub struct Hoo {
    graph: DiGraph<Cell, Half>,
    root: NodeIndex,
    path: Vec<NodeIndex>,
    tuning: Tuning,
    v1: f64,
    rho: f64,
}

impl Hoo {
    pub fn new(region: Region, tuning: Tuning, rng: &mut SmallRng) -> Self {
        let d = region.dim() as f64;
        let v1 = tuning.v1.unwrap_or(4. * d);
        let rho = 2f64.powf(-2. / d);
        let mut graph = DiGraph::new();
        let root = graph.add_node(Cell::new(region, 0, rng));
        Self {
            graph,
            root,
            path: vec![],
            tuning,
            v1,
            rho,
        }
    }

    pub fn graph(&self) -> &DiGraph<Cell, Half> {
        &self.graph
    }
    pub fn root(&self) -> NodeIndex {
        self.root
    }
    pub fn region(&self) -> &Region {
        self.graph[self.root].region()
    }
    pub fn center(&self, node: NodeIndex) -> Action {
        self.graph[node].region().center()
    }

    fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
        self.graph.neighbors_directed(node, Outgoing).collect()
    }
    fn is_leaf(&self, node: NodeIndex) -> bool {
        self.graph
            .neighbors_directed(node, Outgoing)
            .next()
            .is_none()
    }
    fn is_capped(&self, node: NodeIndex) -> bool {
        self.tuning
            .variant
            .cap()
            .is_some_and(|cap| self.graph[node].depth() >= cap)
    }

    /// descend from the root along the highest B-values to a leaf,
    /// expand it, and return it. the recorded path feeds the next
    /// observation; the returned cell is where the action comes from.
    pub fn generate_path(&mut self, rng: &mut SmallRng) -> NodeIndex {
        let mut node = self.root;
        self.path.clear();
        self.path.push(node);
        while !self.is_leaf(node) {
            node = self.choose(node, rng);
            self.path.push(node);
        }
        self.expand(node, rng);
        node
    }

    /// argmax of the children's B-values, ties broken uniformly
    fn choose(&self, node: NodeIndex, rng: &mut SmallRng) -> NodeIndex {
        let children = self.children(node);
        let best = children
            .iter()
            .map(|&c| self.graph[c].bound())
            .fold(f64::NEG_INFINITY, f64::max);
        let ties = children
            .into_iter()
            .filter(|&c| self.graph[c].bound() == best)
            .collect::<Vec<_>>();
        *ties.choose(rng).expect("internal cell has children")
    }

    /// bisect on the stored axis; capped cells are permanent leaves
    fn expand(&mut self, node: NodeIndex, rng: &mut SmallRng) {
        if self.is_capped(node) {
            return;
        }
        let depth = self.graph[node].depth() + 1;
        let (lower, upper) = self.graph[node].region().split(self.graph[node].axis());
        let l = self.graph.add_node(Cell::new(lower, depth, rng));
        let u = self.graph.add_node(Cell::new(upper, depth, rng));
        self.graph.add_edge(node, l, Half::Lower);
        self.graph.add_edge(node, u, Half::Upper);
    }

    pub fn sample_point(&self, node: NodeIndex, mode: Mode, rng: &mut SmallRng) -> Action {
        match mode {
            Mode::Sample => self.graph[node].region().sample(rng),
            Mode::Center => self.center(node),
        }
    }

    /// credit the recorded path with the reward, then refresh U and B
    pub fn observe(&mut self, reward: Reward, t: usize) {
        for &node in &self.path {
            self.graph[node].visit(reward);
        }
        self.refresh(t);
    }

    fn refresh(&mut self, t: usize) {
        let Tuning { ce, variant, .. } = self.tuning;
        let (v1, rho) = (self.v1, self.rho);
        match variant.scope() {
            Scope::Tree => {
                for cell in self.graph.node_weights_mut() {
                    cell.mark();
                    if cell.visits() > 0 {
                        let upper = Self::optimism(cell, &variant, ce, v1, rho, t);
                        cell.set_upper(upper);
                    }
                }
                self.settle(self.root);
            }
            Scope::Path => {
                for &node in &self.path {
                    let cell = &mut self.graph[node];
                    if cell.visits() > 0 {
                        let upper = Self::optimism(cell, &variant, ce, v1, rho, t);
                        cell.set_upper(upper);
                    }
                }
                self.settle_path();
            }
        }
    }

    /// mean + exploration width + diameter bound
    fn optimism(cell: &Cell, variant: &Variant, ce: f64, v1: f64, rho: f64, t: usize) -> f64 {
        cell.average() + variant.confidence(ce, t, cell.visits()) + v1 * rho.powi(cell.depth() as i32)
    }

    /// post-order B sweep gated by the dirty flag, so each cell is
    /// settled exactly once and always after both of its halves
    fn settle(&mut self, node: NodeIndex) {
        if !self.graph[node].marked() {
            return;
        }
        self.graph[node].clear();
        let children = self.children(node);
        let bound = match children.is_empty() {
            true => self.graph[node].upper(),
            false => {
                for &child in &children {
                    self.settle(child);
                }
                let best = children
                    .iter()
                    .map(|&c| self.graph[c].bound())
                    .fold(f64::NEG_INFINITY, f64::max);
                self.graph[node].upper().min(best)
            }
        };
        self.graph[node].set_bound(bound);
    }

    /// the truncated sweep: B climbs the recorded path only, reading
    /// whatever the off-path bounds currently hold
    fn settle_path(&mut self) {
        for i in (0..self.path.len()).rev() {
            let node = self.path[i];
            let children = self.children(node);
            let bound = match children.is_empty() {
                true => self.graph[node].upper(),
                false => {
                    let best = children
                        .iter()
                        .map(|&c| self.graph[c].bound())
                        .fold(f64::NEG_INFINITY, f64::max);
                    self.graph[node].upper().min(best)
                }
            };
            self.graph[node].set_bound(bound);
        }
    }

    /// recommend an action from the cell the exploitation walk lands
    /// on: follow the best empirical average downward, keeping the
    /// incumbent when no child does better
    pub fn best_action(&self, mode: Mode, walk: Walk, rng: &mut SmallRng) -> Action {
        let node = self.exploit(walk);
        self.sample_point(node, mode, rng)
    }

    fn exploit(&self, walk: Walk) -> NodeIndex {
        let mut node = self.root;
        loop {
            let children = self.children(node);
            let Some(best) = children.into_iter().max_by(|&a, &b| {
                self.graph[a]
                    .average()
                    .partial_cmp(&self.graph[b].average())
                    .expect("averages are never NaN")
            }) else {
                return node;
            };
            let improves = match walk {
                Walk::Tolerant => self.graph[best].average() >= self.graph[node].average(),
                Walk::Strict => self.graph[best].average() > self.graph[node].average(),
            };
            match improves {
                true => node = best,
                false => return node,
            }
        }
    }

    /// visited cells of the tree, the introspection record behind
    /// debug logging and the bookkeeping tests
    pub fn survey(&self) -> Vec<Survey> {
        self.graph
            .node_indices()
            .map(|n| &self.graph[n])
            .filter(|c| c.visits() > 0)
            .map(|c| Survey {
                center: c.region().center(),
                depth: c.depth(),
                visits: c.visits(),
                reward: c.reward(),
                upper: c.upper(),
                bound: c.bound(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::Direction::Incoming;
    use rand::SeedableRng;

    fn unit(tuning: Tuning, rng: &mut SmallRng) -> Hoo {
        Hoo::new(Region::from(vec![(0., 1.)]), tuning, rng)
    }

    /// drive the bandit against a fixed function, the way the outer
    /// planner would against a single-step environment
    fn optimize(hoo: &mut Hoo, f: fn(&[f64]) -> f64, n: usize, rng: &mut SmallRng) {
        for t in 1..=n {
            let leaf = hoo.generate_path(rng);
            let action = hoo.sample_point(leaf, Mode::Sample, rng);
            hoo.observe(f(&action), t);
        }
    }

    #[test]
    fn first_observation_values() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut hoo = unit(Tuning::default(), rng);
        let leaf = hoo.generate_path(rng);
        assert!(leaf == hoo.root());
        hoo.observe(1., 1);
        let root = &hoo.graph()[hoo.root()];
        // at t = 1 the log term vanishes: U = 1 + v1, and with both
        // children untried B collapses onto U
        assert!(root.visits() == 1);
        assert!(root.reward() == 1.);
        assert!(root.upper() == 1. + 4.);
        assert!(root.bound() == root.upper());
    }

    #[test]
    fn depth_cap_is_permanent() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let tuning = Tuning {
            variant: Variant::LdHoo { cap: 2 },
            ..Tuning::default()
        };
        let mut hoo = unit(tuning, rng);
        optimize(&mut hoo, |x| x[0], 64, rng);
        let graph = hoo.graph();
        assert!(graph.node_indices().all(|n| graph[n].depth() <= 2));
        let capped = graph
            .node_indices()
            .filter(|&n| graph[n].depth() == 2)
            .collect::<Vec<_>>();
        assert!(!capped.is_empty());
        // capped cells keep accumulating visits without expanding
        assert!(
            capped
                .iter()
                .all(|&n| graph.neighbors_directed(n, Outgoing).next().is_none())
        );
        assert!(capped.iter().map(|&n| graph[n].visits()).sum::<usize>() > 2);
    }

    #[test]
    fn bounds_dominate_after_refresh() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let mut hoo = unit(Tuning::default(), rng);
        optimize(&mut hoo, |x| x[0] * x[0], 128, rng);
        let graph = hoo.graph();
        for n in graph.node_indices() {
            assert!(graph[n].bound() <= graph[n].upper());
            let children = graph.neighbors_directed(n, Outgoing).collect::<Vec<_>>();
            if !children.is_empty() {
                let best = children
                    .iter()
                    .map(|&c| graph[c].bound())
                    .fold(f64::NEG_INFINITY, f64::max);
                assert!(graph[n].bound() <= best);
            }
        }
    }

    #[test]
    fn visits_add_up_along_the_tree() {
        let ref mut rng = SmallRng::seed_from_u64(2);
        let mut hoo = unit(Tuning::default(), rng);
        optimize(&mut hoo, |x| 1. - x[0], 96, rng);
        let graph = hoo.graph();
        // every expanded cell took exactly one terminal visit while it
        // was still a leaf, and forwarded every visit thereafter
        for n in graph.node_indices() {
            let children = graph.neighbors_directed(n, Outgoing).collect::<Vec<_>>();
            if !children.is_empty() && graph[n].visits() > 0 {
                let sum = children.iter().map(|&c| graph[c].visits()).sum::<usize>();
                assert!(graph[n].visits() == sum + 1);
            }
        }
        // and the root saw every round
        assert!(graph[hoo.root()].visits() == 96);
    }

    #[test]
    fn truncated_updates_stay_on_the_path() {
        let ref mut rng = SmallRng::seed_from_u64(3);
        let tuning = Tuning {
            variant: Variant::THoo { horizon: 100 },
            ..Tuning::default()
        };
        let mut hoo = unit(tuning, rng);
        let leaf = hoo.generate_path(rng);
        assert!(leaf == hoo.root());
        hoo.observe(1., 1);
        let expected = 1. + (2. * 100f64.ln()).sqrt() + 4.;
        let root = &hoo.graph()[hoo.root()];
        assert!((root.upper() - expected).abs() < 1e-12);
        // the fresh children were not touched by the sweep
        let graph = hoo.graph();
        for child in graph.neighbors_directed(hoo.root(), Outgoing) {
            assert!(graph[child].upper() == f64::INFINITY);
            assert!(graph[child].bound() == f64::INFINITY);
        }
    }

    #[test]
    fn parents_are_reachable_but_not_owned() {
        let ref mut rng = SmallRng::seed_from_u64(4);
        let mut hoo = unit(Tuning::default(), rng);
        optimize(&mut hoo, |x| x[0], 16, rng);
        let graph = hoo.graph();
        assert!(!petgraph::algo::is_cyclic_directed(graph));
        assert!(
            graph
                .node_indices()
                .filter(|&n| n != hoo.root())
                .all(|n| graph.neighbors_directed(n, Incoming).count() == 1)
        );
    }

    #[test]
    fn strict_walks_stop_at_ties() {
        let ref mut rng = SmallRng::seed_from_u64(5);
        let mut hoo = unit(Tuning::default(), rng);
        optimize(&mut hoo, |_| 0.5, 32, rng);
        // constant rewards tie every average: the tolerant walk
        // descends into the partition, the strict walk keeps the root
        let strict = hoo.best_action(Mode::Center, Walk::Strict, rng);
        let tolerant = hoo.best_action(Mode::Center, Walk::Tolerant, rng);
        assert!(strict == hoo.region().center());
        assert!(tolerant != strict);
    }

    #[test]
    fn finds_the_lopsided_maximum() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut hoo = unit(Tuning::default(), rng);
        optimize(&mut hoo, |x| ((13. * x[0]).sin() * (27. * x[0]).sin() + 1.) / 2., 512, rng);
        let action = hoo.best_action(Mode::Center, Walk::Tolerant, rng);
        let f = |x: f64| ((13. * x).sin() * (27. * x).sin() + 1.) / 2.;
        let best = (0..=10_000).map(|i| f(i as f64 / 10_000.)).fold(0., f64::max);
        assert!(f(action[0]) >= 0.9 * best);
    }
}
