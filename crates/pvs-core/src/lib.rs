//! pvs-core: shared foundation for the process-variable simulator.
//!
//! Contains:
//! - numeric (Real + divisor floor + lag blend factor)
//! - ids (compact indices into the live component set)
//! - io (tag write/read capabilities consumed from the outside world)
//! - timing (per-tick wall-clock statistics)

pub mod ids;
pub mod io;
pub mod numeric;
pub mod timing;

// Re-exports: nice ergonomics for downstream crates
pub use ids::*;
pub use io::{TagIoError, TagReader, TagWriter};
pub use numeric::*;
pub use timing::TickTimer;
