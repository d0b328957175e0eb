//! pvs-components: dynamic models for simulated process variables.
//!
//! Provides the five runtime variants a model record can select:
//! - Sensor: mirrors another model's attribute (with noise and delay) or
//!   holds an externally written value
//! - Flow: first-order lag toward `k * u`
//! - Pressure: mass balance with leakage
//! - Level: tank volume balance
//! - Temperature: first-order lag toward `ambient + k * u`
//!
//! All variants implement [`ProcessModel`]; [`SimComponent`] is the closed
//! set the orchestrator stores. None of them perform I/O, and none of them
//! hold a reference to another component: cross-component inputs are pushed
//! in by the owner before each update.
//!
//! # Example
//!
//! ```
//! use pvs_components::{FlowComponent, ProcessModel};
//!
//! let mut flow = FlowComponent::new("FT-101", 2.0, 1.0, 0.0);
//! flow.set_input(5.0);
//! flow.update(1.0);
//! assert_eq!(flow.current_value(), 10.0);
//! ```

pub mod component;
pub mod error;
pub mod factory;
pub mod flow;
pub mod level;
pub mod pressure;
pub mod sensor;
pub mod temperature;
pub mod traits;

// Re-exports
pub use component::SimComponent;
pub use error::{ComponentError, ComponentResult};
pub use factory::{build_component, build_components};
pub use flow::FlowComponent;
pub use level::LevelComponent;
pub use pressure::PressureComponent;
pub use sensor::{Sensor, SensorParams};
pub use temperature::TemperatureComponent;
pub use traits::{ATTR_VALUE, ProcessModel};
