use crate::Action;
use rand::Rng;
use rand::rngs::SmallRng;

/// an axis-aligned box of allowed actions, one closed interval per
/// axis. immutable once constructed. bisection midpoints are exact in
/// binary, so regions reached by repeated splits compare exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Region(Vec<(f64, f64)>);

impl From<Vec<(f64, f64)>> for Region {
    fn from(space: Vec<(f64, f64)>) -> Self {
        assert!(!space.is_empty(), "action region needs at least one axis");
        assert!(space.iter().all(|(lo, hi)| lo <= hi), "inverted interval");
        Self(space)
    }
}

impl Region {
    pub fn dim(&self) -> usize {
        self.0.len()
    }
    pub fn low(&self) -> Vec<f64> {
        self.0.iter().map(|(lo, _)| *lo).collect()
    }
    pub fn high(&self) -> Vec<f64> {
        self.0.iter().map(|(_, hi)| *hi).collect()
    }
    pub fn center(&self) -> Action {
        self.0.iter().map(|(lo, hi)| (lo + hi) / 2.).collect()
    }
    pub fn contains(&self, action: &[f64]) -> bool {
        action.len() == self.dim()
            && self
                .0
                .iter()
                .zip(action)
                .all(|((lo, hi), x)| lo <= x && x <= hi)
    }

    /// independent uniform draw on each axis
    pub fn sample(&self, rng: &mut SmallRng) -> Action {
        self.0
            .iter()
            .map(|(lo, hi)| lo + (hi - lo) * rng.random::<f64>())
            .collect()
    }

    /// split one interval at its midpoint; every other axis is shared.
    /// a point exactly on the split plane belongs to the lower half.
    pub fn split(&self, axis: usize) -> (Self, Self) {
        let (lo, hi) = self.0[axis];
        let mid = (lo + hi) / 2.;
        let mut lower = self.0.clone();
        let mut upper = self.0.clone();
        lower[axis] = (lo, mid);
        upper[axis] = (mid, hi);
        (Self(lower), Self(upper))
    }
}

impl crate::Arbitrary for Region {
    fn random() -> Self {
        use rand::SeedableRng;
        let ref mut rng = SmallRng::from_rng(&mut rand::rng());
        let d = rng.random_range(1..=4);
        Self::from(
            (0..d)
                .map(|_| {
                    let a: f64 = rng.random_range(-10.0..10.0);
                    let b: f64 = rng.random_range(-10.0..10.0);
                    (a.min(b), a.max(b))
                })
                .collect::<Vec<_>>(),
        )
    }
}
