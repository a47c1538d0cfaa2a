use super::environment::Environment;
use super::environment::Step;
use crate::hoo::Region;
use rand::Rng;
use rand::rngs::SmallRng;

/// continuous mountain car: an underpowered cart must rock across a
/// valley to reach the flag. the plain variant pays 100 at the goal
/// and charges 0.1·u² per step; the smoothed variant shapes the
/// reward with the distance to the goal so sparse-reward planners
/// have a gradient to follow.
#[derive(Debug, Clone, PartialEq)]
pub struct Mountain {
    position: f64,
    velocity: f64,
    smoothed: bool,
    clip: bool,
}

impl Mountain {
    const MIN_ACTION: f64 = -1.;
    const MAX_ACTION: f64 = 1.;
    const MIN_POSITION: f64 = -1.2;
    const MAX_POSITION: f64 = 0.6;
    const MAX_SPEED: f64 = 0.07;
    const GOAL_POSITION: f64 = 0.45;
    const GOAL_VELOCITY: f64 = 0.;
    const POWER: f64 = 0.0015;

    pub fn new(clip: bool, rng: &mut SmallRng) -> Self {
        Self::build(false, clip, rng)
    }

    pub fn smoothed(clip: bool, rng: &mut SmallRng) -> Self {
        Self::build(true, clip, rng)
    }

    fn build(smoothed: bool, clip: bool, rng: &mut SmallRng) -> Self {
        Self {
            position: -0.6 + 0.2 * rng.random::<f64>(),
            velocity: 0.,
            smoothed,
            clip,
        }
    }
}

impl Environment for Mountain {
    fn region(&self) -> Region {
        Region::from(vec![(Self::MIN_ACTION, Self::MAX_ACTION)])
    }

    fn step(&mut self, action: &[f64]) -> Step {
        let force = action[0].clamp(Self::MIN_ACTION, Self::MAX_ACTION);
        self.velocity += force * Self::POWER - 0.0025 * (3. * self.position).cos();
        self.velocity = self.velocity.clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        self.position += self.velocity;
        self.position = self.position.clamp(Self::MIN_POSITION, Self::MAX_POSITION);
        if self.position == Self::MIN_POSITION && self.velocity < 0. {
            self.velocity = 0.;
        }
        let done =
            self.position >= Self::GOAL_POSITION && self.velocity >= Self::GOAL_VELOCITY;
        let reward = match (self.smoothed, done) {
            (false, true) => 100. - 0.1 * force.powi(2),
            (false, false) => -0.1 * force.powi(2),
            (true, true) => 100.,
            (true, false) => 1.66 + (self.position - Self::GOAL_POSITION) - 0.1 * force.powi(2),
        };
        let reward = match (self.smoothed, self.clip) {
            (_, false) => reward,
            (false, true) => (reward + 0.1) / 100.1,
            (true, true) => reward / 100.1,
        };
        Step { reward, done }
    }

    fn observe(&self) -> Vec<f64> {
        vec![self.position, self.velocity]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn starts_in_the_valley() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let env = Mountain::new(false, rng);
        assert!(env.position >= -0.6 && env.position <= -0.4);
        assert!(env.velocity == 0.);
    }

    #[test]
    fn full_throttle_cannot_climb_directly() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut env = Mountain::new(false, rng);
        for _ in 0..50 {
            let step = env.step(&[1.]);
            assert!(!step.done);
            assert!(step.reward < 0.);
        }
        assert!(env.position < Mountain::GOAL_POSITION);
    }

    #[test]
    fn state_respects_the_track_bounds() {
        let ref mut rng = SmallRng::seed_from_u64(1);
        let mut env = Mountain::new(false, rng);
        for i in 0..300 {
            env.step(&[if i % 40 < 20 { 1. } else { -1. }]);
            assert!(env.position >= Mountain::MIN_POSITION);
            assert!(env.position <= Mountain::MAX_POSITION);
            assert!(env.velocity.abs() <= Mountain::MAX_SPEED);
        }
    }

    #[test]
    fn smoothed_rewards_track_progress() {
        let ref mut rng = SmallRng::seed_from_u64(2);
        let mut near = Mountain::smoothed(false, rng);
        let mut far = near.clone();
        near.position = 0.2;
        far.position = -1.0;
        let ahead = near.step(&[0.]).reward;
        let behind = far.step(&[0.]).reward;
        assert!(ahead > behind);
    }
}
