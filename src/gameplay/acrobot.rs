use super::environment::Environment;
use super::environment::Step;
use crate::hoo::Region;
use rand::Rng;
use rand::rngs::SmallRng;
use std::f64::consts::PI;

/// two-link acrobot swing-up with a continuous torque on the elbow
/// instead of the three-valued one. fourth-order runge-kutta over the
/// book dynamics; the run ends when the free end swings above the
/// bar, costing one unit of reward per step until it does.
#[derive(Debug, Clone, PartialEq)]
pub struct Acrobot {
    state: [f64; 4],
}

impl Acrobot {
    const DT: f64 = 0.2;
    const LINK_LENGTH_1: f64 = 1.;
    const LINK_MASS_1: f64 = 1.;
    const LINK_MASS_2: f64 = 1.;
    const LINK_COM_POS_1: f64 = 0.5;
    const LINK_COM_POS_2: f64 = 0.5;
    const LINK_MOI: f64 = 1.;
    const MAX_VEL_1: f64 = 4. * PI;
    const MAX_VEL_2: f64 = 9. * PI;
    const G: f64 = 9.8;

    pub fn new(rng: &mut SmallRng) -> Self {
        let mut state = [0.; 4];
        for s in state.iter_mut() {
            *s = -0.1 + 0.2 * rng.random::<f64>();
        }
        Self { state }
    }

    fn dsdt(s: [f64; 4], torque: f64) -> [f64; 4] {
        let (m1, m2) = (Self::LINK_MASS_1, Self::LINK_MASS_2);
        let l1 = Self::LINK_LENGTH_1;
        let (lc1, lc2) = (Self::LINK_COM_POS_1, Self::LINK_COM_POS_2);
        let (i1, i2) = (Self::LINK_MOI, Self::LINK_MOI);
        let g = Self::G;
        let [theta1, theta2, dtheta1, dtheta2] = s;
        let d1 = m1 * lc1.powi(2)
            + m2 * (l1.powi(2) + lc2.powi(2) + 2. * l1 * lc2 * theta2.cos())
            + i1
            + i2;
        let d2 = m2 * (lc2.powi(2) + l1 * lc2 * theta2.cos()) + i2;
        let phi2 = m2 * lc2 * g * (theta1 + theta2 - PI / 2.).cos();
        let phi1 = -m2 * l1 * lc2 * dtheta2.powi(2) * theta2.sin()
            - 2. * m2 * l1 * lc2 * dtheta2 * dtheta1 * theta2.sin()
            + (m1 * lc1 + m2 * l1) * g * (theta1 - PI / 2.).cos()
            + phi2;
        let ddtheta2 = (torque + d2 / d1 * phi1
            - m2 * l1 * lc2 * dtheta1.powi(2) * theta2.sin()
            - phi2)
            / (m2 * lc2.powi(2) + i2 - d2.powi(2) / d1);
        let ddtheta1 = -(d2 * ddtheta2 + phi1) / d1;
        [dtheta1, dtheta2, ddtheta1, ddtheta2]
    }

    fn rk4(s: [f64; 4], torque: f64) -> [f64; 4] {
        let dt = Self::DT;
        let k1 = Self::dsdt(s, torque);
        let k2 = Self::dsdt(Self::nudge(s, k1, dt / 2.), torque);
        let k3 = Self::dsdt(Self::nudge(s, k2, dt / 2.), torque);
        let k4 = Self::dsdt(Self::nudge(s, k3, dt), torque);
        std::array::from_fn(|i| s[i] + dt / 6. * (k1[i] + 2. * k2[i] + 2. * k3[i] + k4[i]))
    }

    fn nudge(s: [f64; 4], k: [f64; 4], dt: f64) -> [f64; 4] {
        std::array::from_fn(|i| s[i] + dt * k[i])
    }

    fn wrap(angle: f64) -> f64 {
        (angle + PI).rem_euclid(2. * PI) - PI
    }

    fn raised(&self) -> bool {
        let [theta1, theta2, ..] = self.state;
        -theta1.cos() - (theta2 + theta1).cos() > 1.
    }
}

impl Environment for Acrobot {
    fn region(&self) -> Region {
        Region::from(vec![(-1., 1.)])
    }

    fn step(&mut self, action: &[f64]) -> Step {
        let next = Self::rk4(self.state, action[0]);
        self.state = [
            Self::wrap(next[0]),
            Self::wrap(next[1]),
            next[2].clamp(-Self::MAX_VEL_1, Self::MAX_VEL_1),
            next[3].clamp(-Self::MAX_VEL_2, Self::MAX_VEL_2),
        ];
        let done = self.raised();
        Step {
            reward: if done { 0. } else { -1. },
            done,
        }
    }

    fn observe(&self) -> Vec<f64> {
        let [theta1, theta2, dtheta1, dtheta2] = self.state;
        vec![
            theta1.cos(),
            theta1.sin(),
            theta2.cos(),
            theta2.sin(),
            dtheta1,
            dtheta2,
        ]
    }
}
