//! Error types for component construction.

use thiserror::Error;

/// Errors that can occur while turning a record into a component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComponentError {
    #[error("Unsupported model type '{model_type}' for '{name}'")]
    UnsupportedType { name: String, model_type: String },
}

pub type ComponentResult<T> = Result<T, ComponentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ComponentError::UnsupportedType {
            name: "PV1".to_string(),
            model_type: "Pump".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Pump"));
        assert!(msg.contains("PV1"));
    }
}
