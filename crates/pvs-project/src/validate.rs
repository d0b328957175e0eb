//! Model configuration validation.
//!
//! Hard errors stop a file from loading. Warnings describe configurations the
//! simulator tolerates at runtime (a later duplicate tag wins, a dangling
//! reference reads as zero) but which are probably not what the author meant.

use crate::schema::{ModelConfig, ModelFile, ModelKind, inputs, params};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Model #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("Duplicate model name: {name}")]
    DuplicateName { name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    /// Several active records publish to one tag; the last one registered wins.
    DuplicateTag { tag: String, names: Vec<String> },
    /// An input names a model that is not in the set.
    UnresolvedReference {
        name: String,
        role: String,
        target: String,
    },
    /// A sensor names a source but no attribute, or the other way round.
    IncompleteMirror { name: String },
    UnknownType { name: String, model_type: String },
    /// Divisor parameters at or below zero are floored to a small epsilon.
    NonPositiveParam {
        name: String,
        param: &'static str,
        value: f64,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DuplicateTag { tag, names } => write!(
                f,
                "tag '{}' is published by {} (last one wins)",
                tag,
                names.join(", ")
            ),
            ValidationWarning::UnresolvedReference { name, role, target } => write!(
                f,
                "model '{}' input '{}' names unknown model '{}' (reads as 0.0)",
                name, role, target
            ),
            ValidationWarning::IncompleteMirror { name } => write!(
                f,
                "sensor '{}' needs both '{}' and '{}' to mirror a source",
                name,
                inputs::SOURCE_COMPONENT,
                inputs::ATTRIBUTE
            ),
            ValidationWarning::UnknownType { name, model_type } => {
                write!(f, "model '{}' has unknown type '{}'", name, model_type)
            }
            ValidationWarning::NonPositiveParam { name, param, value } => write!(
                f,
                "model '{}' parameter '{}' = {} will be floored",
                name, param, value
            ),
        }
    }
}

pub fn validate_file(file: &ModelFile) -> Result<(), ValidationError> {
    if file.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: file.version,
        });
    }
    validate_models(&file.models)
}

pub fn validate_models(models: &[ModelConfig]) -> Result<(), ValidationError> {
    let mut names = HashSet::new();
    for (index, model) in models.iter().enumerate() {
        if model.name.trim().is_empty() {
            return Err(ValidationError::EmptyName { index });
        }
        if !names.insert(model.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: model.name.clone(),
            });
        }
    }
    Ok(())
}

/// Collect soft issues in record order.
pub fn lint_models(models: &[ModelConfig]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let names: HashSet<&str> = models.iter().map(|m| m.name.as_str()).collect();

    let mut by_tag: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for model in models.iter().filter(|m| m.is_published()) {
        by_tag
            .entry(model.tag.as_str())
            .or_default()
            .push(model.name.clone());
    }
    for (tag, publishers) in by_tag {
        if publishers.len() > 1 {
            warnings.push(ValidationWarning::DuplicateTag {
                tag: tag.to_string(),
                names: publishers,
            });
        }
    }

    for model in models {
        let Some(kind) = model.kind() else {
            warnings.push(ValidationWarning::UnknownType {
                name: model.name.clone(),
                model_type: model.model_type.clone(),
            });
            continue;
        };

        for role in inputs::REFERENCES {
            if let Some(target) = model.input(role) {
                if !names.contains(target) {
                    warnings.push(ValidationWarning::UnresolvedReference {
                        name: model.name.clone(),
                        role: role.to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }

        if kind == ModelKind::Sensor {
            let has_src = model.input(inputs::SOURCE_COMPONENT).is_some();
            let has_attr = model.input(inputs::ATTRIBUTE).is_some();
            if has_src != has_attr {
                warnings.push(ValidationWarning::IncompleteMirror {
                    name: model.name.clone(),
                });
            }
        }

        let floored: &[&'static str] = match kind {
            ModelKind::Flow | ModelKind::Pressure | ModelKind::Temperature => &[params::TAU],
            ModelKind::Level => &[params::AREA],
            ModelKind::None | ModelKind::Sensor => &[],
        };
        for &param in floored {
            if let Some(value) = model.param(param) {
                if value <= 0.0 {
                    warnings.push(ValidationWarning::NonPositiveParam {
                        name: model.name.clone(),
                        param,
                        value,
                    });
                }
            }
        }
    }

    warnings
}
