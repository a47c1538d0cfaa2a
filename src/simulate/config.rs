use crate::gameplay::World;
use crate::hoo::Constants;
use crate::hoo::Mode;
use crate::hoo::Tuning;
use crate::hoo::Variant;
use anyhow::Result;
use anyhow::ensure;
use serde::Serialize;

/// the four planner variants the harness can run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Hoot,
    #[value(name = "ld_hoot")]
    LdHoot,
    #[value(name = "poly_hoot")]
    PolyHoot,
    #[value(name = "t_hoot")]
    THoot,
}

/// everything one run needs, checked once up front and serialized
/// flat into the artifact alongside the trace it produced
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub algorithm: Algorithm,
    pub environment: String,
    pub n_actions: usize,
    pub search_depth: usize,
    pub algorithm_iter: usize,
    pub gamma: f64,
    pub v1: Option<f64>,
    pub ce: f64,
    pub hoo_max_depth: Option<usize>,
    pub alpha: f64,
    pub eta: f64,
    pub xi: f64,
    pub seed: Option<u64>,
    pub clip_reward: bool,
    pub mode: Mode,
    pub reuse_tree: bool,
}

impl Config {
    pub fn new(algorithm: Algorithm, environment: &str) -> Self {
        Self {
            algorithm,
            environment: environment.to_string(),
            n_actions: crate::N_ACTIONS,
            search_depth: crate::SEARCH_DEPTH,
            algorithm_iter: crate::ALGORITHM_ITER,
            gamma: crate::GAMMA,
            v1: None,
            ce: crate::CE,
            hoo_max_depth: None,
            alpha: crate::POLY_ALPHA,
            eta: crate::POLY_ETA,
            xi: crate::POLY_XI,
            seed: None,
            clip_reward: false,
            mode: Mode::Sample,
            reuse_tree: true,
        }
    }

    /// all checks are front-loaded: a validated config cannot fail to
    /// construct its planner
    pub fn validate(&self) -> Result<()> {
        ensure!(
            World::NAMES.contains(&self.environment.as_str()),
            "unknown environment ({})",
            self.environment,
        );
        ensure!(self.n_actions > 0, "n_actions must be positive");
        ensure!(self.search_depth > 0, "search_depth must be positive");
        ensure!(self.algorithm_iter > 0, "algorithm_iter must be positive");
        ensure!(
            self.gamma > 0. && self.gamma <= 1.,
            "gamma must lie in (0, 1]"
        );
        ensure!(self.ce >= 0., "ce must be non-negative");
        ensure!(self.v1.is_none_or(|v1| v1 > 0.), "v1 must be positive");
        ensure!(self.xi != 0., "xi must be non-zero");
        match self.algorithm {
            Algorithm::LdHoot | Algorithm::PolyHoot => ensure!(
                self.hoo_max_depth.is_some(),
                "{:?} requires hoo_max_depth",
                self.algorithm,
            ),
            Algorithm::Hoot | Algorithm::THoot => {}
        }
        Ok(())
    }

    pub fn variant(&self) -> Variant {
        match self.algorithm {
            Algorithm::Hoot => Variant::Hoo,
            Algorithm::THoot => Variant::THoo {
                horizon: self.algorithm_iter,
            },
            Algorithm::LdHoot => Variant::LdHoo {
                cap: self.hoo_max_depth.expect("validated"),
            },
            Algorithm::PolyHoot => Variant::PolyHoo {
                cap: self.hoo_max_depth.expect("validated"),
                constants: Constants {
                    alpha: self.alpha,
                    eta: self.eta,
                    xi: self.xi,
                },
            },
        }
    }

    pub fn tuning(&self) -> Tuning {
        Tuning {
            v1: self.v1,
            ce: self.ce,
            variant: self.variant(),
        }
    }

    /// output directory leaf for this algorithm, depth-suffixed for
    /// the capped variants as in the experiment layout
    pub fn directory(&self) -> String {
        match self.algorithm {
            Algorithm::Hoot => "hoot".to_string(),
            Algorithm::THoot => "t_hoot".to_string(),
            Algorithm::LdHoot => format!("ld_hoot_h_{}", self.hoo_max_depth.expect("validated")),
            Algorithm::PolyHoot => {
                format!("poly_hoot_h_{}", self.hoo_max_depth.expect("validated"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        for name in World::NAMES {
            assert!(Config::new(Algorithm::Hoot, name).validate().is_ok());
        }
    }

    #[test]
    fn unknown_environments_fail() {
        assert!(Config::new(Algorithm::Hoot, "lunar_lander").validate().is_err());
    }

    #[test]
    fn capped_variants_require_a_depth() {
        let mut config = Config::new(Algorithm::LdHoot, "cartpole");
        assert!(config.validate().is_err());
        config.hoo_max_depth = Some(10);
        assert!(config.validate().is_ok());
        let mut config = Config::new(Algorithm::PolyHoot, "cartpole");
        assert!(config.validate().is_err());
        config.hoo_max_depth = Some(10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ranges_are_enforced() {
        let mut config = Config::new(Algorithm::Hoot, "cartpole");
        config.gamma = 0.;
        assert!(config.validate().is_err());
        config.gamma = 1.01;
        assert!(config.validate().is_err());
        config.gamma = 1.;
        assert!(config.validate().is_ok());
        config.v1 = Some(-1.);
        assert!(config.validate().is_err());
    }

    #[test]
    fn truncation_carries_the_iteration_budget() {
        let mut config = Config::new(Algorithm::THoot, "cartpole");
        config.algorithm_iter = 123;
        assert!(config.variant() == Variant::THoo { horizon: 123 });
    }

    #[test]
    fn directories_carry_the_depth_suffix() {
        let mut config = Config::new(Algorithm::PolyHoot, "cartpole");
        config.hoo_max_depth = Some(6);
        assert!(config.directory() == "poly_hoot_h_6");
        assert!(Config::new(Algorithm::Hoot, "cartpole").directory() == "hoot");
    }
}
