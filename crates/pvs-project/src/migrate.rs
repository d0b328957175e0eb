//! Schema migration framework.
//!
//! Version 0 covers the early on-disk shapes: a bare list of records, records
//! carrying both `type` and its old `model_type` spelling, and documents with
//! no `version` field at all.

use crate::ProjectError;
use crate::schema::ModelFile;
use serde_json::Value;
use std::collections::HashSet;

pub const LATEST_VERSION: u32 = 1;

/// Turn a freshly parsed document of any known version into the latest schema.
pub fn upgrade_document(raw: Value) -> Result<ModelFile, ProjectError> {
    let mut doc = match raw {
        Value::Array(models) => {
            let mut map = serde_json::Map::new();
            map.insert("version".to_string(), Value::from(0));
            map.insert("models".to_string(), Value::Array(models));
            Value::Object(map)
        }
        Value::Object(map) => Value::Object(map),
        other => {
            return Err(ProjectError::Migration {
                what: format!("Expected a list or mapping at top level, found {}", kind_of(&other)),
            });
        }
    };

    let version = doc.get("version").and_then(Value::as_u64).unwrap_or(0);
    if version == 0 {
        normalize_v0_records(&mut doc);
        if let Value::Object(map) = &mut doc {
            map.insert("version".to_string(), Value::from(0));
        }
    }

    let file: ModelFile = serde_json::from_value(doc)?;
    migrate_to_latest(file)
}

pub fn migrate_to_latest(mut file: ModelFile) -> Result<ModelFile, ProjectError> {
    while file.version < LATEST_VERSION {
        file = migrate_one_version(file)?;
    }
    Ok(file)
}

fn migrate_one_version(file: ModelFile) -> Result<ModelFile, ProjectError> {
    match file.version {
        0 => migrate_v0_to_v1(file),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Unnamed records get `PV`, then `PV_2`, `PV_3`, ... skipping names in use.
fn migrate_v0_to_v1(mut file: ModelFile) -> Result<ModelFile, ProjectError> {
    let mut taken: HashSet<String> = file
        .models
        .iter()
        .map(|m| m.name.clone())
        .filter(|n| !n.trim().is_empty())
        .collect();
    let mut next = 1;
    for model in &mut file.models {
        if !model.name.trim().is_empty() {
            continue;
        }
        let name = loop {
            let candidate = if next == 1 {
                "PV".to_string()
            } else {
                format!("PV_{next}")
            };
            next += 1;
            if !taken.contains(&candidate) {
                break candidate;
            }
        };
        taken.insert(name.clone());
        model.name = name;
    }
    file.version = 1;
    Ok(file)
}

/// Old writers emitted `model_type` next to `type`; keep `type` and drop the copy.
fn normalize_v0_records(doc: &mut Value) {
    let Some(models) = doc.get_mut("models").and_then(Value::as_array_mut) else {
        return;
    };
    for model in models.iter_mut() {
        if let Value::Object(map) = model {
            if map.contains_key("type") {
                map.remove("model_type");
            }
            // unused roles and params were written as null
            for key in ["inputs", "params"] {
                if matches!(map.get(key), Some(Value::Null)) {
                    map.remove(key);
                } else if let Some(Value::Object(entries)) = map.get_mut(key) {
                    entries.retain(|_, v| !v.is_null());
                }
            }
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
