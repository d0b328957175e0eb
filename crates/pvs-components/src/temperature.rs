//! Temperature with first-order response around an ambient value.

use crate::traits::{ATTR_VALUE, ProcessModel};
use pvs_core::numeric::{floor_positive, lag_alpha};

/// First-order temperature response toward `ambient + k * u`.
#[derive(Clone, Debug)]
pub struct TemperatureComponent {
    name: String,
    tau: f64,
    pub ambient: f64,
    pub k: f64,
    u: f64,
    t: f64,
}

impl TemperatureComponent {
    /// Create a temperature model. With `initial = None` it starts at `ambient`.
    pub fn new(
        name: impl Into<String>,
        tau: f64,
        ambient: f64,
        k: f64,
        initial: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            tau: floor_positive(tau),
            ambient,
            k,
            u: 0.0,
            t: initial.unwrap_or(ambient),
        }
    }

    pub fn set_input(&mut self, u: f64) {
        self.u = u;
    }

    pub fn input(&self) -> f64 {
        self.u
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn target(&self) -> f64 {
        self.ambient + self.k * self.u
    }
}

impl ProcessModel for TemperatureComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f64) {
        let alpha = lag_alpha(dt, self.tau);
        self.t += (self.target() - self.t) * alpha;
    }

    fn current_value(&self) -> f64 {
        self.t
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            ATTR_VALUE | "t" => Some(self.t),
            "u" | "input" => Some(self.u),
            "ambient" => Some(self.ambient),
            "k" => Some(self.k),
            "tau" => Some(self.tau),
            _ => None,
        }
    }
}
