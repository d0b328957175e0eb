//! Error types for orchestration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Components have not been built")]
    NotBuilt,

    #[error("Unknown component: {name}")]
    UnknownComponent { name: String },

    #[error("Component '{name}' does not accept {what}")]
    WrongVariant { name: String, what: &'static str },
}

pub type SimResult<T> = Result<T, SimError>;
