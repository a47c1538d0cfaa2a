/// constants of the polynomial confidence schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constants {
    pub alpha: f64,
    pub eta: f64,
    pub xi: f64,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            alpha: crate::POLY_ALPHA,
            eta: crate::POLY_ETA,
            xi: crate::POLY_XI,
        }
    }
}

/// how much of the tree an observation refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Tree,
    Path,
}

/// the four members of the HOO family. they share the partition tree
/// and differ in the depth cap, the confidence term, and how much of
/// the tree a refresh touches. t-HOO plugs its declared horizon into
/// the confidence bound instead of the running round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Variant {
    Hoo,
    LdHoo { cap: usize },
    PolyHoo { cap: usize, constants: Constants },
    THoo { horizon: usize },
}

impl Variant {
    pub fn cap(&self) -> Option<usize> {
        match self {
            Self::Hoo | Self::THoo { .. } => None,
            Self::LdHoo { cap } | Self::PolyHoo { cap, .. } => Some(*cap),
        }
    }

    pub fn scope(&self) -> Scope {
        match self {
            Self::THoo { .. } => Scope::Path,
            _ => Scope::Tree,
        }
    }

    /// the exploration width added on top of the empirical mean
    pub fn confidence(&self, ce: f64, t: usize, visits: usize) -> f64 {
        let n = visits as f64;
        match self {
            Self::Hoo | Self::LdHoo { .. } => ce * (2. * (t as f64).ln() / n).sqrt(),
            Self::THoo { horizon } => ce * (2. * (*horizon as f64).ln() / n).sqrt(),
            Self::PolyHoo { constants, .. } => {
                ce * (t as f64).powf(constants.alpha / constants.xi) * n.powf(constants.eta - 1.)
            }
        }
    }
}

/// per-bandit parameters, shared by every decision node of a plan.
/// v1 of None resolves to 4·dim when the bandit learns its region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    pub v1: Option<f64>,
    pub ce: f64,
    pub variant: Variant,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            v1: None,
            ce: crate::CE,
            variant: Variant::Hoo,
        }
    }
}
