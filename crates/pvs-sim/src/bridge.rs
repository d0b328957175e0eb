//! Tag bridge: publish named values through an external write capability.
//!
//! The bridge holds `(tag, getter)` pairs and a [`TagWriter`]. On every tick
//! each pair is handled on its own: a getter that fails (or panics) skips
//! that tag for this tick only, and a write failure is absorbed here. Neither
//! ever leaves [`TagBridge::tick`]; both are reported in the returned
//! [`TickReport`] and counted in [`BridgeStats`]. Non-finite values are not
//! faults: they are written like any other value and listed in the report.
//!
//! Getters receive a shared context `&C` (the orchestrator passes its live
//! component set) instead of owning references to the values they read.

use pvs_core::io::{TagReader, TagWriter};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::panic::{AssertUnwindSafe, catch_unwind};
use thiserror::Error;

/// Why a getter produced no value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("source '{0}' is not available")]
    Missing(String),

    #[error("{0}")]
    Other(String),
}

/// Value producer registered for one tag.
pub type Getter<C> = Box<dyn Fn(&C) -> Result<f64, SourceError> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Getter,
    Write,
}

/// One tag that could not be published on a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TagFault {
    pub tag: String,
    pub kind: FaultKind,
    pub message: String,
}

/// Outcome of one [`TagBridge::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// `false` when the bridge was stopped and the tick did nothing.
    pub active: bool,
    pub published: usize,
    pub faults: Vec<TagFault>,
    /// Tags whose getter returned NaN or an infinity. They are still written.
    pub non_finite: Vec<String>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Cumulative counters since the bridge was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub ticks: u64,
    pub published: u64,
    pub getter_faults: u64,
    pub write_faults: u64,
}

pub struct TagBridge<C, W> {
    writer: W,
    // insertion order is publication order; re-registration keeps the slot
    sources: Vec<(String, Getter<C>)>,
    slots: HashMap<String, usize>,
    running: bool,
    stats: BridgeStats,
}

impl<C, W: TagWriter> TagBridge<C, W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            sources: Vec::new(),
            slots: HashMap::new(),
            running: false,
            stats: BridgeStats::default(),
        }
    }

    /// Register (or replace) the getter for `tag`.
    ///
    /// Returns `true` if an earlier getter for the same tag was replaced.
    pub fn register_source<F>(&mut self, tag: impl Into<String>, getter: F) -> bool
    where
        F: Fn(&C) -> Result<f64, SourceError> + Send + 'static,
    {
        let tag = tag.into();
        match self.slots.get(&tag) {
            Some(&slot) => {
                self.sources[slot].1 = Box::new(getter);
                true
            }
            None => {
                self.slots.insert(tag.clone(), self.sources.len());
                self.sources.push((tag, Box::new(getter)));
                false
            }
        }
    }

    /// Drop every registration. The running flag is left alone.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.slots.clear();
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registered tags in publication order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|(tag, _)| tag.as_str())
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Publish every registered value once. No-op while stopped.
    pub fn tick(&mut self, ctx: &C) -> TickReport {
        if !self.running {
            return TickReport::default();
        }

        let mut report = TickReport {
            active: true,
            ..TickReport::default()
        };

        for (tag, getter) in &self.sources {
            let value = match catch_unwind(AssertUnwindSafe(|| getter(ctx))) {
                Ok(Ok(v)) => {
                    if !v.is_finite() {
                        tracing::debug!(%tag, value = v, "publishing non-finite value");
                        report.non_finite.push(tag.clone());
                    }
                    v
                }
                Ok(Err(e)) => {
                    report.faults.push(fault(tag, FaultKind::Getter, e.to_string()));
                    continue;
                }
                Err(payload) => {
                    report.faults.push(fault(tag, FaultKind::Getter, panic_message(payload)));
                    continue;
                }
            };

            let writer = &mut self.writer;
            match catch_unwind(AssertUnwindSafe(|| writer.write_tag(tag, value))) {
                Ok(Ok(())) => report.published += 1,
                Ok(Err(e)) => report.faults.push(fault(tag, FaultKind::Write, e.to_string())),
                Err(payload) => {
                    report.faults.push(fault(tag, FaultKind::Write, panic_message(payload)))
                }
            }
        }

        self.stats.ticks += 1;
        self.stats.published += report.published as u64;
        for f in &report.faults {
            match f.kind {
                FaultKind::Getter => self.stats.getter_faults += 1,
                FaultKind::Write => self.stats.write_faults += 1,
            }
            tracing::debug!(tag = %f.tag, kind = ?f.kind, message = %f.message, "tag skipped");
        }
        report
    }
}

fn fault(tag: &str, kind: FaultKind, message: String) -> TagFault {
    TagFault {
        tag: tag.to_string(),
        kind,
        message,
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panicked: {s}")
    } else {
        "panicked".to_string()
    }
}

/// Check which tags answer a read.
pub fn validate_tags<R, I, S>(reader: &R, tags: I) -> BTreeMap<String, bool>
where
    R: TagReader + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| {
            let tag = tag.as_ref();
            (tag.to_string(), reader.read_tag(tag).is_ok())
        })
        .collect()
}

/// Read current values of `tags`, substituting 0.0 for failed reads.
pub fn read_tags<R, I, S>(reader: &R, tags: I) -> Vec<(String, f64)>
where
    R: TagReader + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| {
            let tag = tag.as_ref();
            let value = reader.read_tag(tag).unwrap_or_else(|e| {
                tracing::debug!(%tag, error = %e, "read failed, using 0.0");
                0.0
            });
            (tag.to_string(), value)
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use pvs_core::io::TagIoError;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn tick_publishes_exactly_the_working_getters(
            outcomes in prop::collection::vec(0u8..3, 0..24),
        ) {
            let mut writes: Vec<String> = Vec::new();
            let mut bridge: TagBridge<(), _> = TagBridge::new(|tag: &str, _: f64| {
                writes.push(tag.to_string());
                Ok::<(), TagIoError>(())
            });
            for (i, outcome) in outcomes.iter().enumerate() {
                let tag = format!("T{i}");
                match outcome {
                    0 => bridge.register_source(tag, move |_| Ok(i as f64)),
                    1 => bridge.register_source(tag, |_| Err(SourceError::Other("down".into()))),
                    _ => bridge.register_source(tag, |_| panic!("getter failed")),
                };
            }
            bridge.start();
            let report = bridge.tick(&());
            drop(bridge);

            let expected: Vec<String> = outcomes
                .iter()
                .enumerate()
                .filter(|(_, o)| **o == 0)
                .map(|(i, _)| format!("T{i}"))
                .collect();
            prop_assert_eq!(report.published, expected.len());
            prop_assert_eq!(report.faults.len(), outcomes.len() - expected.len());
            prop_assert!(report.faults.iter().all(|f| f.kind == FaultKind::Getter));
            prop_assert_eq!(writes, expected);
        }
    }
}
