//! Pressure from an inlet/outlet mass balance with leakage.

use crate::traits::{ATTR_VALUE, ProcessModel};
use pvs_core::numeric::floor_positive;

/// Pressure dynamics:
///
/// `dP/dt = (k_in * q_in - k_out * q_out - leak * P) / tau`
///
/// integrated with explicit Euler. Flows must be pushed with
/// [`PressureComponent::set_flows`] before each update.
#[derive(Clone, Debug)]
pub struct PressureComponent {
    name: String,
    pub k_in: f64,
    pub k_out: f64,
    tau: f64,
    pub leak: f64,
    p: f64,
    qin: f64,
    qout: f64,
}

impl PressureComponent {
    pub fn new(
        name: impl Into<String>,
        k_in: f64,
        k_out: f64,
        tau: f64,
        leak: f64,
        initial: f64,
    ) -> Self {
        Self {
            name: name.into(),
            k_in,
            k_out,
            tau: floor_positive(tau),
            leak,
            p: initial,
            qin: 0.0,
            qout: 0.0,
        }
    }

    pub fn set_flows(&mut self, qin: f64, qout: f64) {
        self.qin = qin;
        self.qout = qout;
    }

    /// Last flows pushed in, as `(qin, qout)`.
    pub fn flows(&self) -> (f64, f64) {
        (self.qin, self.qout)
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    /// Rate of change at the current state.
    pub fn dpdt(&self) -> f64 {
        (self.k_in * self.qin - self.k_out * self.qout - self.leak * self.p) / self.tau
    }
}

impl ProcessModel for PressureComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f64) {
        self.p += self.dpdt() * dt;
    }

    fn current_value(&self) -> f64 {
        self.p
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            ATTR_VALUE | "p" => Some(self.p),
            "qin" => Some(self.qin),
            "qout" => Some(self.qout),
            "k_in" => Some(self.k_in),
            "k_out" => Some(self.k_out),
            "tau" => Some(self.tau),
            "leak" => Some(self.leak),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euler_step() {
        let mut p = PressureComponent::new("PT", 1.0, 1.0, 2.0, 0.0, 0.0);
        p.set_flows(4.0, 1.0);
        p.update(0.5);
        // (4 - 1) / 2 * 0.5
        assert!((p.current_value() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn leak_decays_toward_zero() {
        let mut p = PressureComponent::new("PT", 1.0, 1.0, 1.0, 0.5, 10.0);
        p.set_flows(0.0, 0.0);
        let mut prev = p.current_value();
        for _ in 0..20 {
            p.update(0.1);
            assert!(p.current_value() < prev);
            assert!(p.current_value() > 0.0);
            prev = p.current_value();
        }
    }

    #[test]
    fn balanced_flows_hold_pressure_without_leak() {
        let mut p = PressureComponent::new("PT", 2.0, 1.0, 2.0, 0.0, 3.0);
        p.set_flows(1.0, 2.0);
        p.update(1.0);
        assert_eq!(p.current_value(), 3.0);
    }

    #[test]
    fn negative_flows_are_accepted() {
        let mut p = PressureComponent::new("PT", 1.0, 1.0, 1.0, 0.0, 0.0);
        p.set_flows(-2.0, 0.0);
        p.update(1.0);
        assert_eq!(p.current_value(), -2.0);
    }
}
