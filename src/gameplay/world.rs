use super::acrobot::Acrobot;
use super::cartpole::CartPole;
use super::environment::Environment;
use super::environment::Step;
use super::function::Function;
use super::mountain::Mountain;
use super::pendulum::Pendulum;
use crate::hoo::Region;
use anyhow::Result;
use anyhow::bail;
use rand::rngs::SmallRng;

/// the environment factory: resolves a configured name into a
/// concrete collaborator. enum dispatch keeps the planner generic
/// without trait objects or an inheritance hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub enum World {
    Function(Function),
    CartPole(CartPole),
    Pendulum(Pendulum),
    Mountain(Mountain),
    Acrobot(Acrobot),
}

impl World {
    pub const NAMES: [&'static str; 7] = [
        "test_function",
        "cartpole",
        "ig_cartpole",
        "inverted_pendulum",
        "mountain_car",
        "smoothed_mountain_car",
        "acrobot",
    ];

    pub fn new(name: &str, clip: bool, rng: &mut SmallRng) -> Result<Self> {
        match name {
            "test_function" => Ok(Self::Function(Function::default())),
            "cartpole" => Ok(Self::CartPole(CartPole::new(rng))),
            "ig_cartpole" => Ok(Self::CartPole(CartPole::ig(rng))),
            "inverted_pendulum" => Ok(Self::Pendulum(Pendulum::new(clip, rng))),
            "mountain_car" => Ok(Self::Mountain(Mountain::new(clip, rng))),
            "smoothed_mountain_car" => Ok(Self::Mountain(Mountain::smoothed(clip, rng))),
            "acrobot" => Ok(Self::Acrobot(Acrobot::new(rng))),
            _ => bail!("unknown environment name ({})", name),
        }
    }
}

impl Environment for World {
    fn region(&self) -> Region {
        match self {
            Self::Function(env) => env.region(),
            Self::CartPole(env) => env.region(),
            Self::Pendulum(env) => env.region(),
            Self::Mountain(env) => env.region(),
            Self::Acrobot(env) => env.region(),
        }
    }
    fn step(&mut self, action: &[f64]) -> Step {
        match self {
            Self::Function(env) => env.step(action),
            Self::CartPole(env) => env.step(action),
            Self::Pendulum(env) => env.step(action),
            Self::Mountain(env) => env.step(action),
            Self::Acrobot(env) => env.step(action),
        }
    }
    fn observe(&self) -> Vec<f64> {
        match self {
            Self::Function(env) => env.observe(),
            Self::CartPole(env) => env.observe(),
            Self::Pendulum(env) => env.observe(),
            Self::Mountain(env) => env.observe(),
            Self::Acrobot(env) => env.observe(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn every_name_resolves() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        for name in World::NAMES {
            let world = World::new(name, false, rng).unwrap();
            assert!(world.region().dim() == 1);
        }
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        assert!(World::new("lunar_lander", false, rng).is_err());
        assert!(World::new("", false, rng).is_err());
    }

    #[test]
    fn seeding_pins_the_initial_state() {
        let ref mut a = SmallRng::seed_from_u64(7);
        let ref mut b = SmallRng::seed_from_u64(7);
        let left = World::new("cartpole", false, a).unwrap();
        let right = World::new("cartpole", false, b).unwrap();
        assert!(left == right);
    }
}
