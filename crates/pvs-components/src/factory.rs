//! Build runtime components from model records.
//!
//! The factory only constructs; cross-component wiring (flows, drive
//! inputs, sensor sources) is the orchestrator's job.

use crate::component::SimComponent;
use crate::error::{ComponentError, ComponentResult};
use crate::flow::FlowComponent;
use crate::level::LevelComponent;
use crate::pressure::PressureComponent;
use crate::sensor::{Sensor, SensorParams};
use crate::temperature::TemperatureComponent;
use pvs_project::{ModelConfig, ModelKind, params};

/// Parameter defaults applied when a record leaves a key out.
pub mod defaults {
    pub const FLOW_K: f64 = 1.0;
    pub const FLOW_TAU: f64 = 1.0;
    pub const PRESSURE_K_IN: f64 = 1.0;
    pub const PRESSURE_K_OUT: f64 = 1.0;
    pub const PRESSURE_TAU: f64 = 2.0;
    pub const PRESSURE_LEAK: f64 = 0.0;
    pub const LEVEL_AREA: f64 = 1.0;
    pub const TEMPERATURE_TAU: f64 = 5.0;
    pub const TEMPERATURE_AMBIENT: f64 = 25.0;
    pub const TEMPERATURE_K: f64 = 1.0;
    pub const INITIAL: f64 = 0.0;
    pub const NOISE_STD: f64 = 0.0;
}

const FALLBACK_NAME: &str = "PV";

/// Create the component selected by `cfg.model_type` (case-insensitive).
///
/// `None` and unrecognized types fail with
/// [`ComponentError::UnsupportedType`]; callers are expected to filter
/// placeholder records out beforehand.
pub fn build_component(cfg: &ModelConfig) -> ComponentResult<SimComponent> {
    let name = if cfg.name.is_empty() {
        FALLBACK_NAME
    } else {
        cfg.name.as_str()
    };
    let p = |key: &str, default: f64| cfg.param(key).unwrap_or(default);

    let component = match cfg.kind() {
        Some(ModelKind::Sensor) => Sensor::new(
            name,
            SensorParams {
                noise_std: p(params::NOISE_STD, defaults::NOISE_STD),
                lag_samples: sample_count(cfg.param(params::LAG_SAMPLES)),
                initial: p(params::INITIAL, defaults::INITIAL),
                seed: cfg
                    .param(params::SEED)
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .map(|s| s as u64),
            },
        )
        .into(),
        Some(ModelKind::Flow) => FlowComponent::new(
            name,
            p(params::K, defaults::FLOW_K),
            p(params::TAU, defaults::FLOW_TAU),
            p(params::INITIAL, defaults::INITIAL),
        )
        .into(),
        Some(ModelKind::Pressure) => PressureComponent::new(
            name,
            p(params::K_IN, defaults::PRESSURE_K_IN),
            p(params::K_OUT, defaults::PRESSURE_K_OUT),
            p(params::TAU, defaults::PRESSURE_TAU),
            p(params::LEAK, defaults::PRESSURE_LEAK),
            p(params::INITIAL, defaults::INITIAL),
        )
        .into(),
        Some(ModelKind::Level) => LevelComponent::new(
            name,
            p(params::AREA, defaults::LEVEL_AREA),
            p(params::INITIAL, defaults::INITIAL),
        )
        .into(),
        Some(ModelKind::Temperature) => TemperatureComponent::new(
            name,
            p(params::TAU, defaults::TEMPERATURE_TAU),
            p(params::AMBIENT, defaults::TEMPERATURE_AMBIENT),
            p(params::K, defaults::TEMPERATURE_K),
            cfg.param(params::INITIAL),
        )
        .into(),
        Some(ModelKind::None) | None => {
            return Err(ComponentError::UnsupportedType {
                name: name.to_string(),
                model_type: cfg.model_type.clone(),
            });
        }
    };
    Ok(component)
}

/// Build every record independently; one failure does not affect the others.
pub fn build_components(models: &[ModelConfig]) -> Vec<ComponentResult<SimComponent>> {
    models.iter().map(build_component).collect()
}

fn sample_count(raw: Option<f64>) -> usize {
    match raw {
        Some(v) if v.is_finite() && v >= 1.0 => v as usize,
        _ => 0,
    }
}
