use super::environment::Environment;
use super::environment::Step;
use crate::hoo::Region;
use rand::Rng;
use rand::rngs::SmallRng;
use std::f64::consts::PI;

/// classic-control cart-pole with a continuous force input instead of
/// the usual two-valued push. explicit euler integration; the episode
/// ends when the cart or the pole leaves its window, and every
/// surviving step is worth one unit of reward.
#[derive(Debug, Clone, PartialEq)]
pub struct CartPole {
    gravity: f64,
    masscart: f64,
    masspole: f64,
    length: f64,
    force_mag: f64,
    tau: f64,
    state: [f64; 4],
}

impl CartPole {
    const X_THRESHOLD: f64 = 2.4;
    const THETA_THRESHOLD: f64 = 12. * 2. * PI / 360.;

    pub fn new(rng: &mut SmallRng) -> Self {
        Self::build(9.8, 1.0, 0.1, 0.5, 10.0, 0.02, rng)
    }

    /// the heavier parameterization: stronger gravity, a longer and
    /// heavier pole, used to stress the depth-capped planners
    pub fn ig(rng: &mut SmallRng) -> Self {
        Self::build(50., 1.0, 0.5, 2.0, 10.0, 0.02, rng)
    }

    fn build(
        gravity: f64,
        masscart: f64,
        masspole: f64,
        length: f64,
        force_mag: f64,
        tau: f64,
        rng: &mut SmallRng,
    ) -> Self {
        let mut state = [0.; 4];
        for s in state.iter_mut() {
            *s = -0.05 + 0.1 * rng.random::<f64>();
        }
        Self {
            gravity,
            masscart,
            masspole,
            length,
            force_mag,
            tau,
            state,
        }
    }

    fn total_mass(&self) -> f64 {
        self.masscart + self.masspole
    }
    fn polemass_length(&self) -> f64 {
        self.masspole * self.length
    }
}

impl Environment for CartPole {
    fn region(&self) -> Region {
        Region::from(vec![(-self.force_mag, self.force_mag)])
    }

    fn step(&mut self, action: &[f64]) -> Step {
        let [x, x_dot, theta, theta_dot] = self.state;
        let force = action[0];
        let costheta = theta.cos();
        let sintheta = theta.sin();
        let temp =
            (force + self.polemass_length() * theta_dot.powi(2) * sintheta) / self.total_mass();
        let thetaacc = (self.gravity * sintheta - costheta * temp)
            / (self.length * (4. / 3. - self.masspole * costheta.powi(2) / self.total_mass()));
        let xacc = temp - self.polemass_length() * thetaacc * costheta / self.total_mass();
        self.state = [
            x + self.tau * x_dot,
            x_dot + self.tau * xacc,
            theta + self.tau * theta_dot,
            theta_dot + self.tau * thetaacc,
        ];
        let done = self.state[0].abs() > Self::X_THRESHOLD
            || self.state[2].abs() > Self::THETA_THRESHOLD;
        Step {
            reward: if done { 0. } else { 1. },
            done,
        }
    }

    fn observe(&self) -> Vec<f64> {
        self.state.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn starts_near_upright() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let env = CartPole::new(rng);
        assert!(env.observe().iter().all(|s| s.abs() <= 0.05));
    }

    #[test]
    fn survives_a_few_idle_steps() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut env = CartPole::new(rng);
        for _ in 0..10 {
            let step = env.step(&[0.]);
            assert!(step.reward == 1.);
            assert!(!step.done);
        }
    }

    #[test]
    fn a_constant_shove_topples_the_pole() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut env = CartPole::new(rng);
        let mut done = false;
        for _ in 0..500 {
            let step = env.step(&[10.]);
            if step.done {
                assert!(step.reward == 0.);
                done = true;
                break;
            }
        }
        assert!(done);
    }

    #[test]
    fn snapshots_do_not_share_state() {
        let ref mut rng = SmallRng::seed_from_u64(0);
        let mut env = CartPole::new(rng);
        let snapshot = env.clone();
        env.step(&[5.]);
        assert!(env != snapshot);
        assert!(snapshot.observe().iter().all(|s| s.abs() <= 0.05));
    }
}
