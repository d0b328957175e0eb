//! Flow rate with first-order response to a drive input.

use crate::traits::{ATTR_VALUE, ProcessModel};
use pvs_core::numeric::{floor_positive, lag_alpha};

/// First-order flow response toward `k * u`.
///
/// `u` is a drive input (pump speed, valve opening) set through
/// [`FlowComponent::set_input`]. Each update blends the output toward the
/// target by `alpha = min(1, dt / tau)`, so a step never overshoots.
#[derive(Clone, Debug)]
pub struct FlowComponent {
    name: String,
    /// Proportional gain
    pub k: f64,
    tau: f64,
    u: f64,
    y: f64,
}

impl FlowComponent {
    /// Create a flow model. `tau` is floored at a small positive epsilon.
    pub fn new(name: impl Into<String>, k: f64, tau: f64, initial: f64) -> Self {
        Self {
            name: name.into(),
            k,
            tau: floor_positive(tau),
            u: 0.0,
            y: initial,
        }
    }

    pub fn set_input(&mut self, u: f64) {
        self.u = u;
    }

    pub fn input(&self) -> f64 {
        self.u
    }

    /// Time constant in seconds (after flooring).
    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Value the output converges to for the current input.
    pub fn target(&self) -> f64 {
        self.k * self.u
    }
}

impl ProcessModel for FlowComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f64) {
        let alpha = lag_alpha(dt, self.tau);
        self.y += (self.target() - self.y) * alpha;
    }

    fn current_value(&self) -> f64 {
        self.y
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            ATTR_VALUE | "y" => Some(self.y),
            "u" | "input" => Some(self.u),
            "k" => Some(self.k),
            "tau" => Some(self.tau),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_full_step_reaches_target() {
        let mut flow = FlowComponent::new("F", 2.0, 1.0, 0.0);
        flow.set_input(5.0);
        flow.update(1.0);
        assert_eq!(flow.current_value(), 5.0 * 2.0);
    }

    #[test]
    fn half_steps_approach_without_overshoot() {
        let mut flow = FlowComponent::new("F", 2.0, 1.0, 0.0);
        flow.set_input(5.0);
        flow.update(0.5);
        let first = flow.current_value();
        flow.update(0.5);
        let second = flow.current_value();
        assert!((first - 5.0).abs() < 1e-12);
        assert!((second - 7.5).abs() < 1e-12);
        assert!(second <= 10.0);
    }

    #[test]
    fn zero_tau_is_floored() {
        let mut flow = FlowComponent::new("F", 1.0, 0.0, 0.0);
        assert!(flow.tau() > 0.0);
        flow.set_input(3.0);
        flow.update(0.1);
        assert_eq!(flow.current_value(), 3.0);
    }

    #[test]
    fn attributes() {
        let mut flow = FlowComponent::new("F", 1.5, 2.0, 4.0);
        flow.set_input(1.0);
        assert_eq!(flow.attribute("value"), Some(4.0));
        assert_eq!(flow.attribute("u"), Some(1.0));
        assert_eq!(flow.attribute("k"), Some(1.5));
        assert_eq!(flow.attribute("tau"), Some(2.0));
        assert_eq!(flow.attribute("nope"), None);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn approaches_target_monotonically(
            k in -5.0_f64..5.0,
            u in -10.0_f64..10.0,
            tau in 0.01_f64..10.0,
            initial in -50.0_f64..50.0,
            dt in 0.001_f64..5.0,
            steps in 1_usize..50,
        ) {
            let mut flow = FlowComponent::new("F", k, tau, initial);
            flow.set_input(u);
            let target = k * u;
            let mut prev_gap = (initial - target).abs();
            let side = (initial - target).signum();
            for _ in 0..steps {
                flow.update(dt);
                let y = flow.current_value();
                let gap = (y - target).abs();
                prop_assert!(gap <= prev_gap + 1e-9);
                // never crosses to the other side of the target
                prop_assert!((y - target) * side >= -1e-9);
                prev_gap = gap;
            }
        }
    }
}
