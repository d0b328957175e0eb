//! Cross-wiring tables cached at build time.
//!
//! Flow and control links keep the *names* they read from and are resolved
//! against the live set on every tick, so a missing upstream reads as 0.0.
//! Mirror links are resolved once to an id, since a sensor's source does not
//! change within a session.

use crate::set::ComponentSet;
use pvs_components::ProcessModel;
use pvs_core::ComponentId;
use pvs_project::{ModelConfig, ModelKind, inputs};

/// Inlet/outlet flow names feeding a pressure or level component.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowLink {
    pub target: ComponentId,
    pub inlet: Option<String>,
    pub outlet: Option<String>,
}

/// Drive input name feeding a flow or temperature component.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlLink {
    pub target: ComponentId,
    pub control: String,
}

/// Source of a mirror-mode sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorLink {
    pub sensor: ComponentId,
    pub source: ComponentId,
    pub attribute: String,
}

#[derive(Debug, Default)]
pub struct Links {
    pub flows: Vec<FlowLink>,
    pub controls: Vec<ControlLink>,
    /// Indexed by sensor slot; `None` for non-mirror components.
    mirrors: Vec<Option<MirrorLink>>,
    /// Sensors that named a source that is not in the live set.
    pub unbound_mirrors: Vec<String>,
}

impl Links {
    /// Cache links for every record whose component made it into `set`.
    ///
    /// Mirror sensors are bound to their source here.
    pub fn resolve(models: &[ModelConfig], set: &mut ComponentSet) -> Self {
        let mut links = Links {
            mirrors: vec![None; set.len()],
            ..Links::default()
        };

        for cfg in models {
            let Some(target) = set.id_of(&cfg.name) else {
                continue;
            };
            let Some(kind) = set.by_id(target).map(|c| c.kind()) else {
                continue;
            };

            if kind.takes_flows() {
                links.flows.push(FlowLink {
                    target,
                    inlet: cfg.input(inputs::INLET_FLOW).map(str::to_string),
                    outlet: cfg.input(inputs::OUTLET_FLOW).map(str::to_string),
                });
            } else if kind.takes_control() {
                if let Some(control) = cfg.input(inputs::CONTROL) {
                    links.controls.push(ControlLink {
                        target,
                        control: control.to_string(),
                    });
                }
            } else if kind == ModelKind::Sensor {
                let (Some(src), Some(attr)) = (
                    cfg.input(inputs::SOURCE_COMPONENT),
                    cfg.input(inputs::ATTRIBUTE),
                ) else {
                    continue;
                };
                let Some(source) = set.id_of(src) else {
                    links.unbound_mirrors.push(cfg.name.clone());
                    continue;
                };
                if let Some(sensor) = set.by_id_mut(target).and_then(|c| c.as_sensor_mut()) {
                    sensor.bind_source(src, attr);
                    links.mirrors[target.index()] = Some(MirrorLink {
                        sensor: target,
                        source,
                        attribute: attr.to_string(),
                    });
                }
            }
        }

        links
    }

    pub fn mirror_for(&self, sensor: ComponentId) -> Option<&MirrorLink> {
        self.mirrors.get(sensor.index()).and_then(Option::as_ref)
    }

    pub fn mirror_count(&self) -> usize {
        self.mirrors.iter().filter(|m| m.is_some()).count()
    }

    /// Push current upstream values into every linked component.
    ///
    /// Names that do not resolve read as 0.0.
    pub fn apply_inputs(&self, set: &mut ComponentSet) {
        for link in &self.flows {
            let qin = read(set, link.inlet.as_deref());
            let qout = read(set, link.outlet.as_deref());
            if let Some(c) = set.by_id_mut(link.target) {
                c.set_flows(qin, qout);
            }
        }
        for link in &self.controls {
            let u = read(set, Some(link.control.as_str()));
            if let Some(c) = set.by_id_mut(link.target) {
                c.set_input(u);
            }
        }
    }

    /// Sample the source attribute for one sensor; unknown attributes read 0.0.
    pub fn sample_mirror(&self, set: &ComponentSet, sensor: ComponentId) -> Option<f64> {
        let link = self.mirror_for(sensor)?;
        let value = set
            .by_id(link.source)
            .and_then(|c| c.attribute(&link.attribute))
            .unwrap_or(0.0);
        Some(value)
    }
}

fn read(set: &ComponentSet, name: Option<&str>) -> f64 {
    name.and_then(|n| set.value_of(n)).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pvs_components::build_component;
    use pvs_project::params;

    fn live(models: &[ModelConfig]) -> ComponentSet {
        let mut set = ComponentSet::new();
        for cfg in models {
            if let Ok(c) = build_component(cfg) {
                set.insert(cfg.name.clone(), c);
            }
        }
        set
    }

    #[test]
    fn flow_links_resolve_late() {
        let models = vec![
            ModelConfig::new("Fill", ModelKind::Flow).with_param(params::INITIAL, 3.0),
            ModelConfig::new("Tank", ModelKind::Level)
                .with_input(inputs::INLET_FLOW, "Fill")
                .with_input(inputs::OUTLET_FLOW, "Gone"),
        ];
        let mut set = live(&models);
        let links = Links::resolve(&models, &mut set);
        assert_eq!(links.flows.len(), 1);

        links.apply_inputs(&mut set);
        match set.get("Tank") {
            Some(pvs_components::SimComponent::Level(l)) => assert_eq!(l.flows(), (3.0, 0.0)),
            other => panic!("expected level, got {other:?}"),
        }
    }

    #[test]
    fn mirror_binds_once_and_reports_missing_sources() {
        let models = vec![
            ModelConfig::new("F", ModelKind::Flow).with_param(params::INITIAL, 2.0),
            ModelConfig::new("Echo", ModelKind::Sensor)
                .with_input(inputs::SOURCE_COMPONENT, "F")
                .with_input(inputs::ATTRIBUTE, "value"),
            ModelConfig::new("Orphan", ModelKind::Sensor)
                .with_input(inputs::SOURCE_COMPONENT, "Nowhere")
                .with_input(inputs::ATTRIBUTE, "value"),
        ];
        let mut set = live(&models);
        let links = Links::resolve(&models, &mut set);

        assert_eq!(links.mirror_count(), 1);
        assert_eq!(links.unbound_mirrors, vec!["Orphan".to_string()]);
        let echo = set.id_of("Echo").unwrap();
        assert_eq!(links.sample_mirror(&set, echo), Some(2.0));
        assert!(set.get("Echo").unwrap().as_sensor().unwrap().is_mirror());
        assert!(!set.get("Orphan").unwrap().as_sensor().unwrap().is_mirror());
    }

    #[test]
    fn control_link_drives_flow() {
        let models = vec![
            ModelConfig::new("PumpSpeed", ModelKind::Sensor).with_param(params::INITIAL, 0.8),
            ModelConfig::new("F", ModelKind::Flow).with_input(inputs::CONTROL, "PumpSpeed"),
        ];
        let mut set = live(&models);
        let links = Links::resolve(&models, &mut set);
        links.apply_inputs(&mut set);
        match set.get("F") {
            Some(pvs_components::SimComponent::Flow(f)) => assert_eq!(f.input(), 0.8),
            other => panic!("expected flow, got {other:?}"),
        }
    }
}
