use super::artifact::Artifact;
use super::config::Config;
use crate::gameplay::State;
use crate::gameplay::World;
use crate::hoot::Planner;
use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::time::Instant;

/// drives the planner against the real environment for a fixed
/// number of committed actions and collects the trace. between
/// commits the planner either keeps the committed subtree as its new
/// root or rebuilds from the advanced state, per the configuration.
pub struct Simulator(Config);

impl From<Config> for Simulator {
    fn from(config: Config) -> Self {
        Self(config)
    }
}

impl Simulator {
    pub fn run(&self) -> Result<Artifact> {
        let ref config = self.0;
        config.validate()?;
        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let world = World::new(&config.environment, config.clip_reward, &mut rng)?;
        let state = State::from(world);
        let mut actions = Vec::new();
        let mut rewards = Vec::new();
        let mut states = vec![state.observe()];
        let mut planner = self.planner(state, &mut rng);
        let progress = crate::progress(config.n_actions);
        for k in 1..=config.n_actions {
            let action = planner.run(config.algorithm_iter, config.mode, &mut rng)?;
            let survey = planner.root().bandit().survey();
            log::debug!(
                "planned over {} cells to depth {}",
                survey.len(),
                survey.iter().map(|s| s.depth).max().unwrap_or(0),
            );
            let (reward, done) = planner.advance(&action, &mut rng)?;
            if !config.reuse_tree {
                planner = self.planner(planner.root().state().clone(), &mut rng);
            }
            log::debug!(
                "action {:>4} of {} reward {:+.3}",
                k,
                config.n_actions,
                reward,
            );
            actions.push(action);
            rewards.push(reward);
            states.push(planner.observe());
            progress.inc(1);
            if done {
                log::info!("terminal state after {} of {} actions", k, config.n_actions);
                break;
            }
        }
        progress.finish_and_clear();
        Ok(Artifact {
            actions,
            rewards,
            state: states,
            running_time: start.elapsed().as_secs_f64(),
            date: chrono::Local::now().to_rfc3339(),
            config: config.clone(),
        })
    }

    fn planner(&self, state: State<World>, rng: &mut SmallRng) -> Planner<World> {
        let ref config = self.0;
        Planner::new(
            state,
            config.search_depth,
            config.gamma,
            config.tuning(),
            rng,
        )
        .with_seed(config.seed)
    }
}
