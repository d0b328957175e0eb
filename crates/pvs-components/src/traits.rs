//! Core trait for process-variable models.

/// Attribute name every model answers with its primary output.
pub const ATTR_VALUE: &str = "value";

/// Uniform update/read contract shared by every variant.
///
/// Both methods are deterministic given the current state and inputs (a
/// noisy sensor draws from its own generator), and neither performs I/O.
pub trait ProcessModel {
    /// Model name for logging and lookup.
    fn name(&self) -> &str;

    /// Advance internal state by `dt` seconds.
    ///
    /// A zero-length step leaves [`ProcessModel::current_value`] unchanged.
    fn update(&mut self, dt: f64);

    /// Current primary process value.
    fn current_value(&self) -> f64;

    /// Read a named attribute (`"value"`, a parameter, or an internal signal).
    ///
    /// Returns `None` for names the model does not know.
    fn attribute(&self, name: &str) -> Option<f64>;
}
