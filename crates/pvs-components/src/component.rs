//! Closed set of runtime model variants.

use crate::flow::FlowComponent;
use crate::level::LevelComponent;
use crate::pressure::PressureComponent;
use crate::sensor::Sensor;
use crate::temperature::TemperatureComponent;
use crate::traits::ProcessModel;
use pvs_project::ModelKind;

/// One live component, as built by the factory.
#[derive(Clone, Debug)]
pub enum SimComponent {
    Sensor(Sensor),
    Flow(FlowComponent),
    Pressure(PressureComponent),
    Level(LevelComponent),
    Temperature(TemperatureComponent),
}

impl SimComponent {
    pub fn kind(&self) -> ModelKind {
        match self {
            SimComponent::Sensor(_) => ModelKind::Sensor,
            SimComponent::Flow(_) => ModelKind::Flow,
            SimComponent::Pressure(_) => ModelKind::Pressure,
            SimComponent::Level(_) => ModelKind::Level,
            SimComponent::Temperature(_) => ModelKind::Temperature,
        }
    }

    fn model(&self) -> &dyn ProcessModel {
        match self {
            SimComponent::Sensor(c) => c,
            SimComponent::Flow(c) => c,
            SimComponent::Pressure(c) => c,
            SimComponent::Level(c) => c,
            SimComponent::Temperature(c) => c,
        }
    }

    fn model_mut(&mut self) -> &mut dyn ProcessModel {
        match self {
            SimComponent::Sensor(c) => c,
            SimComponent::Flow(c) => c,
            SimComponent::Pressure(c) => c,
            SimComponent::Level(c) => c,
            SimComponent::Temperature(c) => c,
        }
    }

    /// Push inlet/outlet flows. Returns `false` for variants without flows.
    pub fn set_flows(&mut self, qin: f64, qout: f64) -> bool {
        match self {
            SimComponent::Pressure(c) => c.set_flows(qin, qout),
            SimComponent::Level(c) => c.set_flows(qin, qout),
            _ => return false,
        }
        true
    }

    /// Push a drive input. Returns `false` for variants without one.
    pub fn set_input(&mut self, u: f64) -> bool {
        match self {
            SimComponent::Flow(c) => c.set_input(u),
            SimComponent::Temperature(c) => c.set_input(u),
            _ => return false,
        }
        true
    }

    pub fn as_sensor(&self) -> Option<&Sensor> {
        match self {
            SimComponent::Sensor(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sensor_mut(&mut self) -> Option<&mut Sensor> {
        match self {
            SimComponent::Sensor(s) => Some(s),
            _ => None,
        }
    }
}

impl ProcessModel for SimComponent {
    fn name(&self) -> &str {
        self.model().name()
    }

    fn update(&mut self, dt: f64) {
        self.model_mut().update(dt)
    }

    fn current_value(&self) -> f64 {
        self.model().current_value()
    }

    fn attribute(&self, name: &str) -> Option<f64> {
        self.model().attribute(name)
    }
}

impl From<Sensor> for SimComponent {
    fn from(c: Sensor) -> Self {
        SimComponent::Sensor(c)
    }
}

impl From<FlowComponent> for SimComponent {
    fn from(c: FlowComponent) -> Self {
        SimComponent::Flow(c)
    }
}

impl From<PressureComponent> for SimComponent {
    fn from(c: PressureComponent) -> Self {
        SimComponent::Pressure(c)
    }
}

impl From<LevelComponent> for SimComponent {
    fn from(c: LevelComponent) -> Self {
        SimComponent::Level(c)
    }
}

impl From<TemperatureComponent> for SimComponent {
    fn from(c: TemperatureComponent) -> Self {
        SimComponent::Temperature(c)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::sensor::SensorParams;
    use proptest::prelude::*;

    fn variants(initial: f64, drive: f64) -> Vec<SimComponent> {
        let mut mirror = Sensor::new(
            "S",
            SensorParams {
                noise_std: 1.0,
                lag_samples: 2,
                initial,
                seed: Some(1),
            },
        );
        mirror.bind_source("F", "value");
        mirror.observe(drive);
        let mut all = vec![
            SimComponent::from(mirror),
            FlowComponent::new("F", 2.0, 0.5, initial).into(),
            PressureComponent::new("P", 1.0, 1.0, 2.0, 0.3, initial).into(),
            LevelComponent::new("L", 1.5, initial).into(),
            TemperatureComponent::new("T", 5.0, 25.0, 1.0, Some(initial)).into(),
        ];
        for c in &mut all {
            c.set_input(drive);
            c.set_flows(drive, drive * 0.5);
        }
        all
    }

    proptest! {
        #[test]
        fn zero_step_is_idempotent(initial in -100.0_f64..100.0, drive in -10.0_f64..10.0) {
            for mut c in variants(initial, drive) {
                let before = c.current_value();
                c.update(0.0);
                prop_assert_eq!(c.current_value(), before);
            }
        }
    }
}
