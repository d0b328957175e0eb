//! Capabilities the simulator consumes from the industrial tag interface.
//!
//! The simulator never manages a connection. It only needs to write a named
//! value on every tick and, for discovery tooling, read one back. Closures
//! with the matching signature implement both traits, so a test can pass
//! `|tag: &str, value: f64| { ...; Ok(()) }` wherever a writer is expected.

use thiserror::Error;

/// Failure reported by an external tag interface.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TagIoError {
    /// The interface answered but refused the operation.
    #[error("Tag '{tag}' rejected: {reason}")]
    Rejected { tag: String, reason: String },

    /// The interface could not be reached.
    #[error("Tag interface unreachable: {message}")]
    Unreachable { message: String },

    /// The tag holds something that is not a number.
    #[error("Tag '{tag}' is not numeric")]
    NotNumeric { tag: String },
}

/// Write a named value to an external address.
pub trait TagWriter {
    fn write_tag(&mut self, tag: &str, value: f64) -> Result<(), TagIoError>;
}

impl<F> TagWriter for F
where
    F: FnMut(&str, f64) -> Result<(), TagIoError>,
{
    fn write_tag(&mut self, tag: &str, value: f64) -> Result<(), TagIoError> {
        self(tag, value)
    }
}

/// Read a named value from an external address.
pub trait TagReader {
    fn read_tag(&self, tag: &str) -> Result<f64, TagIoError>;
}

impl<F> TagReader for F
where
    F: Fn(&str) -> Result<f64, TagIoError>,
{
    fn read_tag(&self, tag: &str) -> Result<f64, TagIoError> {
        self(tag)
    }
}

/// Adapt a boolean-returning write function (`true` = accepted).
pub fn from_bool_writer<F>(mut f: F) -> impl FnMut(&str, f64) -> Result<(), TagIoError>
where
    F: FnMut(&str, f64) -> bool,
{
    move |tag: &str, value: f64| {
        if f(tag, value) {
            Ok(())
        } else {
            Err(TagIoError::Rejected {
                tag: tag.to_string(),
                reason: "write returned false".to_string(),
            })
        }
    }
}
