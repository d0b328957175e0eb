//! Model configuration schema.
//!
//! A [`ModelConfig`] describes one simulated process variable: which dynamic
//! model to build, where to publish it, which other models it reads from and
//! its numeric parameters. Files hold a [`ModelFile`] with a list of them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelFile {
    pub version: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, models: Vec<ModelConfig>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            models,
        }
    }
}

/// Model variants a record can select.
///
/// `None` is a valid placeholder for records that are still being staged and
/// has no runtime behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModelKind {
    None,
    Sensor,
    Flow,
    Pressure,
    Level,
    Temperature,
}

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::None,
        ModelKind::Sensor,
        ModelKind::Flow,
        ModelKind::Pressure,
        ModelKind::Level,
        ModelKind::Temperature,
    ];

    /// Case-insensitive parse; surrounding whitespace is ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::None => "None",
            ModelKind::Sensor => "Sensor",
            ModelKind::Flow => "Flow",
            ModelKind::Pressure => "Pressure",
            ModelKind::Level => "Level",
            ModelKind::Temperature => "Temperature",
        }
    }

    /// Pressure and level models take inlet/outlet flows each tick.
    pub fn takes_flows(self) -> bool {
        matches!(self, ModelKind::Pressure | ModelKind::Level)
    }

    /// Flow and temperature models take a scalar drive input.
    pub fn takes_control(self) -> bool {
        matches!(self, ModelKind::Flow | ModelKind::Temperature)
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown model type: {0}")]
pub struct UnknownModelKind(pub String);

impl FromStr for ModelKind {
    type Err = UnknownModelKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::parse(s).ok_or_else(|| UnknownModelKind(s.to_string()))
    }
}

/// Well-known keys of [`ModelConfig::inputs`].
pub mod inputs {
    pub const INLET_FLOW: &str = "inlet_flow";
    pub const OUTLET_FLOW: &str = "outlet_flow";
    pub const CONTROL: &str = "control";
    pub const SOURCE_COMPONENT: &str = "source_component";
    pub const ATTRIBUTE: &str = "attribute";

    /// Input roles whose value names another model.
    pub const REFERENCES: [&str; 4] = [INLET_FLOW, OUTLET_FLOW, CONTROL, SOURCE_COMPONENT];
}

/// Well-known keys of [`ModelConfig::params`].
pub mod params {
    pub const K: &str = "k";
    pub const TAU: &str = "tau";
    pub const K_IN: &str = "k_in";
    pub const K_OUT: &str = "k_out";
    pub const LEAK: &str = "leak";
    pub const AREA: &str = "area";
    pub const AMBIENT: &str = "ambient";
    pub const INITIAL: &str = "initial";
    pub const NOISE_STD: &str = "noise_std";
    pub const LAG_SAMPLES: &str = "lag_samples";
    pub const SEED: &str = "seed";
}

/// One simulated process variable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    #[serde(default)]
    pub name: String,
    /// Raw model type as written in the file; see [`ModelConfig::kind`].
    #[serde(rename = "type", alias = "model_type", default = "default_model_type")]
    pub model_type: String,
    /// External address to publish to; empty means "do not publish".
    #[serde(default)]
    pub tag: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub inputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

fn default_model_type() -> String {
    ModelKind::None.as_str().to_string()
}

fn default_active() -> bool {
    true
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            model_type: default_model_type(),
            tag: String::new(),
            active: default_active(),
            inputs: BTreeMap::new(),
            params: BTreeMap::new(),
        }
    }
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            model_type: kind.as_str().to_string(),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn with_input(mut self, role: impl Into<String>, target: impl Into<String>) -> Self {
        self.inputs.insert(role.into(), target.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: f64) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Parsed model type, `None` if the string is not recognized.
    pub fn kind(&self) -> Option<ModelKind> {
        ModelKind::parse(&self.model_type)
    }

    pub fn param(&self, key: &str) -> Option<f64> {
        self.params.get(key).copied()
    }

    /// Named input; blank values count as absent.
    pub fn input(&self, role: &str) -> Option<&str> {
        self.inputs
            .get(role)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Active records with a tag are published on every tick.
    pub fn is_published(&self) -> bool {
        self.active && !self.tag.is_empty()
    }
}
