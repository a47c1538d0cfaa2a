//! Experiment runner.
//!
//! Sweeps the selected planner variants over a range of seeds against
//! one environment and writes a JSON artifact per (algorithm, seed).

use anyhow::Result;
use clap::Parser;
use hoot::hoo::Mode;
use hoot::simulate::Algorithm;
use hoot::simulate::Config;
use hoot::simulate::Simulator;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "simulate", about = "plan continuous actions with the HOO family")]
struct Args {
    /// planner variants to run
    #[arg(short, long, value_enum, num_args = 1.., default_value = "hoot")]
    algorithms: Vec<Algorithm>,
    /// environment name resolved by the factory
    #[arg(short, long)]
    environment: String,
    /// number of random seeds: runs seeds 0..n
    #[arg(short, long, default_value_t = 1)]
    seeds: u64,
    /// committed real-world actions per run
    #[arg(long, default_value_t = 150)]
    n_actions: usize,
    /// outer rollout horizon
    #[arg(long, default_value_t = 50)]
    search_depth: usize,
    /// planning iterations per committed action
    #[arg(long, default_value_t = 100)]
    algorithm_iter: usize,
    /// discount factor
    #[arg(long, default_value_t = 0.99)]
    gamma: f64,
    /// smoothness constant, defaults to 4·dim
    #[arg(long)]
    v1: Option<f64>,
    /// exploration constant
    #[arg(long, default_value_t = 1.0)]
    ce: f64,
    /// bandit depth cap, required for ld_hoot and poly_hoot
    #[arg(long)]
    hoo_max_depth: Option<usize>,
    /// poly-hoo alpha
    #[arg(long, default_value_t = 5.0)]
    alpha: f64,
    /// poly-hoo eta
    #[arg(long, default_value_t = 20.0)]
    eta: f64,
    /// poly-hoo xi
    #[arg(long, default_value_t = 0.5)]
    xi: f64,
    /// remap rewards into the unit interval where supported
    #[arg(long)]
    clip_reward: bool,
    /// draw committed actions from cells or take their centers
    #[arg(long, value_enum, default_value = "sample")]
    mode: Mode,
    /// rebuild the planner from scratch after every committed action
    /// instead of reusing the committed subtree
    #[arg(long)]
    rebuild: bool,
    /// output directory for run artifacts
    #[arg(long, default_value = "runs")]
    out: PathBuf,
}

impl Args {
    fn config(&self, algorithm: Algorithm, seed: u64) -> Config {
        let mut config = Config::new(algorithm, &self.environment);
        config.n_actions = self.n_actions;
        config.search_depth = self.search_depth;
        config.algorithm_iter = self.algorithm_iter;
        config.gamma = self.gamma;
        config.v1 = self.v1;
        config.ce = self.ce;
        config.hoo_max_depth = self.hoo_max_depth;
        config.alpha = self.alpha;
        config.eta = self.eta;
        config.xi = self.xi;
        config.seed = Some(seed);
        config.clip_reward = self.clip_reward;
        config.mode = self.mode;
        config.reuse_tree = !self.rebuild;
        config
    }
}

fn main() -> Result<()> {
    hoot::init();
    let args = Args::parse();
    let runs = args
        .algorithms
        .iter()
        .flat_map(|&algorithm| (0..args.seeds).map(move |seed| (algorithm, seed)))
        .collect::<Vec<_>>();
    // configuration problems are fatal before anything runs; a failed
    // seed mid-sweep only costs that seed
    for &(algorithm, seed) in &runs {
        args.config(algorithm, seed).validate()?;
    }
    for (algorithm, seed) in runs {
        log::info!("algorithm {:?} seed {}", algorithm, seed);
        match Simulator::from(args.config(algorithm, seed)).run() {
            Err(e) => log::error!("seed {} failed: {:#}", seed, e),
            Ok(artifact) => match artifact.save(&args.out) {
                Err(e) => log::error!("artifact not saved: {:#}", e),
                Ok(path) => log::info!(
                    "saved {:?} (mean reward {:+.3})",
                    path,
                    artifact.mean_reward(),
                ),
            },
        }
    }
    Ok(())
}
