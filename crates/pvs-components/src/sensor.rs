//! Sensor: mirrors another model's attribute or holds a written value.
//!
//! In mirror mode the owner samples the source attribute and hands it over
//! with [`Sensor::observe`] before each update; the sensor then applies
//! optional Gaussian noise and a fixed sample delay. Without a source the
//! sensor is a holding register driven by [`Sensor::write`].

use crate::traits::{ATTR_VALUE, ProcessModel};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use std::collections::VecDeque;

/// Construction parameters for [`Sensor`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorParams {
    /// Standard deviation of additive noise; zero disables noise.
    pub noise_std: f64,
    /// Delay in samples; zero disables the delay line.
    pub lag_samples: usize,
    pub initial: f64,
    /// Fixed generator seed for reproducible noise.
    pub seed: Option<u64>,
}

/// Source binding of a mirror-mode sensor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MirrorSource {
    pub component: String,
    pub attribute: String,
}

#[derive(Clone, Debug)]
pub struct Sensor {
    name: String,
    tag: Option<String>,
    value: f64,
    source: Option<MirrorSource>,
    sample: f64,
    noise_std: f64,
    noise: Option<Normal<f64>>,
    rng: StdRng,
    lag: usize,
    history: VecDeque<f64>,
}

impl Sensor {
    pub fn new(name: impl Into<String>, params: SensorParams) -> Self {
        let noise = if params.noise_std > 0.0 {
            Normal::new(0.0, params.noise_std).ok()
        } else {
            None
        };
        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            name: name.into(),
            tag: None,
            value: params.initial,
            source: None,
            sample: 0.0,
            noise_std: params.noise_std,
            noise,
            rng,
            lag: params.lag_samples,
            history: VecDeque::with_capacity(params.lag_samples + 1),
        }
    }

    /// Switch to mirror mode, copying `attribute` of `component`.
    pub fn bind_source(&mut self, component: impl Into<String>, attribute: impl Into<String>) {
        self.source = Some(MirrorSource {
            component: component.into(),
            attribute: attribute.into(),
        });
        self.history.clear();
    }

    pub fn source(&self) -> Option<&MirrorSource> {
        self.source.as_ref()
    }

    pub fn is_mirror(&self) -> bool {
        self.source.is_some()
    }

    /// Hand over the latest source reading; consumed by the next update.
    pub fn observe(&mut self, sample: f64) {
        self.sample = sample;
    }

    /// Set the held value directly.
    pub fn write(&mut self, value: f64) {
        self.value = value;
    }

    /// Pull-style read, independent of any bridge.
    pub fn read(&self) -> f64 {
        self.current_value()
    }

    pub fn bind_tag(&mut self, tag: impl Into<String>) {
        self.tag = Some(tag.into());
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn lag_samples(&self) -> usize {
        self.lag
    }

    fn delayed(&mut self, value: f64) -> f64 {
        if self.lag == 0 {
            return value;
        }
        self.history.push_back(value);
        if self.history.len() > self.lag {
            self.history.pop_front().unwrap_or(0.0)
        } else {
            // cold start: nothing old enough yet
            0.0
        }
    }
}

impl ProcessModel for Sensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, dt: f64) {
        if self.source.is_none() || dt <= 0.0 {
            return;
        }
        let mut value = self.sample;
        if let Some(noise) = &self.noise {
            value += noise.sample(&mut self.rng);
        }
        self.value = self.delayed(value);
    }

    fn current_value(&self) -> f64 {
        self.value
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        match name {
            ATTR_VALUE => Some(self.value),
            "noise_std" => Some(self.noise_std),
            "lag_samples" => Some(self.lag as f64),
            _ => None,
        }
    }
}
