//! pvs-project: model configuration file format, validation and discovery merge.

pub mod merge;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use merge::{MergeStats, discovered_from_tags, merge_discovered};
pub use migrate::{LATEST_VERSION, migrate_to_latest, upgrade_document};
pub use schema::*;
pub use validate::{ValidationError, ValidationWarning, lint_models, validate_file, validate_models};

use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported file extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<ModelFile> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = if content.trim().is_empty() {
        serde_json::Value::Array(Vec::new())
    } else {
        serde_yaml::from_str(&content)?
    };
    finish_load(raw)
}

pub fn save_yaml(path: &Path, file: &ModelFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_yaml::to_string(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<ModelFile> {
    let content = std::fs::read_to_string(path)?;
    let raw: serde_json::Value = if content.trim().is_empty() {
        serde_json::Value::Array(Vec::new())
    } else {
        serde_json::from_str(&content)?
    };
    finish_load(raw)
}

pub fn save_json(path: &Path, file: &ModelFile) -> ProjectResult<()> {
    validate_file(file)?;
    let content = serde_json::to_string_pretty(file)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.yaml`/`.yml` or `.json`.
pub fn load(path: &Path) -> ProjectResult<ModelFile> {
    match Format::from_path(path)? {
        Format::Yaml => load_yaml(path),
        Format::Json => load_json(path),
    }
}

/// Save by extension: `.yaml`/`.yml` or `.json`.
pub fn save(path: &Path, file: &ModelFile) -> ProjectResult<()> {
    match Format::from_path(path)? {
        Format::Yaml => save_yaml(path, file),
        Format::Json => save_json(path, file),
    }
}

fn finish_load(raw: serde_json::Value) -> ProjectResult<ModelFile> {
    let file = upgrade_document(raw)?;
    validate_file(&file)?;
    for warning in lint_models(&file.models) {
        tracing::debug!(%warning, "model configuration warning");
    }
    Ok(file)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> ProjectResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => Err(ProjectError::UnknownFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
