use super::environment::Environment;
use super::environment::Step;
use crate::hoo::Region;

/// single-shot optimization of a fixed function: the reward of an
/// action is f(action) and every action is terminal. this is the
/// benchmark harness for exercising bandits against a known optimum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Function {
    f: fn(&[f64]) -> f64,
    lo: f64,
    hi: f64,
}

impl Function {
    pub fn new(f: fn(&[f64]) -> f64, lo: f64, hi: f64) -> Self {
        Self { f, lo, hi }
    }
}

impl Default for Function {
    /// (sin(13x) · sin(27x) + 1) / 2 on the unit interval, a bumpy
    /// curve whose global maximum sits near x = 0.8675
    fn default() -> Self {
        Self {
            f: |x| ((13. * x[0]).sin() * (27. * x[0]).sin() + 1.) / 2.,
            lo: 0.,
            hi: 1.,
        }
    }
}

impl Environment for Function {
    fn region(&self) -> Region {
        Region::from(vec![(self.lo, self.hi)])
    }
    fn step(&mut self, action: &[f64]) -> Step {
        Step {
            reward: (self.f)(action),
            done: true,
        }
    }
    fn observe(&self) -> Vec<f64> {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_step_is_terminal() {
        let mut env = Function::default();
        let step = env.step(&[0.5]);
        assert!(step.done);
        assert!(step.reward >= 0. && step.reward <= 1.);
    }

    #[test]
    fn rewards_follow_the_curve() {
        let mut env = Function::new(|x| x[0] * 2., -1., 1.);
        assert!(env.step(&[0.25]).reward == 0.5);
        assert!(env.region() == Region::from(vec![(-1., 1.)]));
    }
}
