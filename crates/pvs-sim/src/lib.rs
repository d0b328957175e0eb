//! Fixed-step orchestration of process-variable models.
//!
//! Provides:
//! - Tag bridge publishing values through an external write capability with
//!   per-tag fault isolation
//! - Live component set with name and index lookup
//! - Orchestrator: build, cross-wire, start/stop, step, blocking run loop
//! - Ready-made write sinks (log, in-memory)

pub mod bridge;
pub mod error;
pub mod links;
pub mod orchestrator;
pub mod set;
pub mod sink;

// Re-exports for public API
pub use bridge::{
    BridgeStats, FaultKind, Getter, SourceError, TagBridge, TagFault, TickReport, read_tags,
    validate_tags,
};
pub use error::{SimError, SimResult};
pub use orchestrator::{
    BuildReport, Orchestrator, RunState, RunSummary, SimOptions, StepReport, StopHandle,
};
pub use set::ComponentSet;
pub use sink::{LogSink, MemorySink};
