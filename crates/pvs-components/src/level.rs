//! Tank level from a volume balance.

use crate::traits::{ATTR_VALUE, ProcessModel};
use pvs_core::numeric::floor_positive;

/// Tank level: `dH/dt = (q_in - q_out) / area`, explicit Euler.
#[derive(Clone, Debug)]
pub struct LevelComponent {
    name: String,
    area: f64,
    h: f64,
    qin: f64,
    qout: f64,
}

impl LevelComponent {
    /// `area` is floored at a small positive epsilon.
    pub fn new(name: impl Into<String>, area: f64, initial: f64) -> Self {
        Self {
            name: name.into(),
            area: floor_positive(area),
            h: initial,
            qin: 0.0,
            qout: 0.0,
        }
    }

    pub fn set_flows(&mut self, qin: f64, qout: f64) {
        self.qin = qin;
        self.qout = qout;
    }

    pub fn flows(&self) -> (f64, f64) {
        (self.qin, self.qout)
    }

    pub fn area(&self) -> f64 {
        self.area
    }
}

impl ProcessModel for LevelComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f64) {
        self.h += (self.qin - self.qout) / self.area * dt;
    }

    fn current_value(&self) -> f64 {
        self.h
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            ATTR_VALUE | "h" => Some(self.h),
            "qin" => Some(self.qin),
            "qout" => Some(self.qout),
            "area" => Some(self.area),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_at_net_rate_over_area() {
        let mut level = LevelComponent::new("LT", 2.0, 0.0);
        level.set_flows(4.0, 0.0);
        level.update(1.0);
        assert_eq!(level.current_value(), 2.0);
    }

    #[test]
    fn drains_below_zero_without_clamping() {
        let mut level = LevelComponent::new("LT", 1.0, 0.5);
        level.set_flows(0.0, 1.0);
        level.update(1.0);
        assert_eq!(level.current_value(), -0.5);
    }

    #[test]
    fn tiny_area_is_floored() {
        let level = LevelComponent::new("LT", 0.0, 0.0);
        assert!(level.area() > 0.0);
    }
}
