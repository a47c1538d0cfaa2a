use super::environment::Environment;
use super::environment::Step;
use crate::hoo::Region;
use rand::Rng;
use rand::rngs::SmallRng;
use std::f64::consts::PI;

/// torque-limited pendulum swing-up. never terminal; the reward is
/// the negated quadratic cost of angle, speed, and effort, optionally
/// remapped into the unit interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Pendulum {
    theta: f64,
    theta_dot: f64,
    clip: bool,
}

impl Pendulum {
    const MAX_SPEED: f64 = 8.;
    const MAX_TORQUE: f64 = 2.;
    const DT: f64 = 0.05;
    const G: f64 = 10.;
    const M: f64 = 1.;
    const L: f64 = 1.;
    /// worst reachable cost, the denominator of the unit remap
    const COST_CEILING: f64 = 16.2736044;

    pub fn new(clip: bool, rng: &mut SmallRng) -> Self {
        Self {
            theta: -PI + 2. * PI * rng.random::<f64>(),
            theta_dot: -1. + 2. * rng.random::<f64>(),
            clip,
        }
    }

    fn fold(angle: f64) -> f64 {
        (angle + PI).rem_euclid(2. * PI) - PI
    }
}

impl Environment for Pendulum {
    fn region(&self) -> Region {
        Region::from(vec![(-Self::MAX_TORQUE, Self::MAX_TORQUE)])
    }

    fn step(&mut self, action: &[f64]) -> Step {
        let u = action[0].clamp(-Self::MAX_TORQUE, Self::MAX_TORQUE);
        let cost =
            Self::fold(self.theta).powi(2) + 0.1 * self.theta_dot.powi(2) + 0.001 * u.powi(2);
        let accel = 3. * Self::G / (2. * Self::L) * self.theta.sin()
            + 3. / (Self::M * Self::L.powi(2)) * u;
        self.theta_dot = (self.theta_dot + accel * Self::DT).clamp(-Self::MAX_SPEED, Self::MAX_SPEED);
        self.theta += self.theta_dot * Self::DT;
        let reward = match self.clip {
            false => -cost,
            true => (Self::COST_CEILING - cost) / Self::COST_CEILING,
        };
        Step {
            reward,
            done: false,
        }
    }

    fn observe(&self) -> Vec<f64> {
        vec![self.theta.cos(), self.theta.sin(), self.theta_dot]
    }
}
