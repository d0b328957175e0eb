//! Ready-made write sinks.

use pvs_core::io::{TagIoError, TagWriter};
use std::collections::BTreeMap;

/// Writes every value to the log at `info` level. Never fails.
#[derive(Debug, Default)]
pub struct LogSink {
    writes: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl TagWriter for LogSink {
    fn write_tag(&mut self, tag: &str, value: f64) -> Result<(), TagIoError> {
        self.writes += 1;
        tracing::info!(%tag, value, "tag write");
        Ok(())
    }
}

/// Keeps every write in memory. Tags listed with [`MemorySink::reject`]
/// fail their writes.
#[derive(Debug, Default)]
pub struct MemorySink {
    latest: BTreeMap<String, f64>,
    history: Vec<(String, f64)>,
    rejected: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write to `tag` fail.
    pub fn reject(mut self, tag: impl Into<String>) -> Self {
        self.rejected.push(tag.into());
        self
    }

    pub fn latest(&self, tag: &str) -> Option<f64> {
        self.latest.get(tag).copied()
    }

    pub fn snapshot(&self) -> &BTreeMap<String, f64> {
        &self.latest
    }

    /// Accepted writes in order.
    pub fn history(&self) -> &[(String, f64)] {
        &self.history
    }

    pub fn writes(&self) -> usize {
        self.history.len()
    }

    /// Accepted writes for one tag in order.
    pub fn series(&self, tag: &str) -> Vec<f64> {
        self.history
            .iter()
            .filter(|(t, _)| t == tag)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl TagWriter for MemorySink {
    fn write_tag(&mut self, tag: &str, value: f64) -> Result<(), TagIoError> {
        if self.rejected.iter().any(|t| t == tag) {
            return Err(TagIoError::Rejected {
                tag: tag.to_string(),
                reason: "rejected by sink".to_string(),
            });
        }
        self.latest.insert(tag.to_string(), value);
        self.history.push((tag.to_string(), value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_keeps_latest_and_history() {
        let mut sink = MemorySink::new();
        sink.write_tag("A", 1.0).unwrap();
        sink.write_tag("B", 2.0).unwrap();
        sink.write_tag("A", 3.0).unwrap();
        assert_eq!(sink.latest("A"), Some(3.0));
        assert_eq!(sink.series("A"), vec![1.0, 3.0]);
        assert_eq!(sink.writes(), 3);
    }

    #[test]
    fn memory_sink_rejects_listed_tags() {
        let mut sink = MemorySink::new().reject("BAD");
        assert!(sink.write_tag("BAD", 1.0).is_err());
        assert_eq!(sink.latest("BAD"), None);
        assert_eq!(sink.writes(), 0);
    }

    #[test]
    fn log_sink_counts() {
        let mut sink = LogSink::new();
        sink.write_tag("A", 1.0).unwrap();
        assert_eq!(sink.writes(), 1);
    }
}
