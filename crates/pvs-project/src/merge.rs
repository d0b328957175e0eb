//! Reconcile models discovered on a live controller with an existing set.

use crate::schema::{ModelConfig, ModelKind};
use std::collections::HashSet;

/// Outcome counts of [`merge_discovered`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub skipped: usize,
    /// Existing records are never overwritten, so this stays zero.
    pub updated: usize,
}

/// Merge discovered records into `existing` using `tag` as the key.
///
/// Existing records are kept as they are and in their order. A discovered
/// record is appended only if its tag is non-empty and not already present
/// (in `existing` or earlier in `discovered`); otherwise it is skipped.
pub fn merge_discovered(
    existing: &[ModelConfig],
    discovered: &[ModelConfig],
) -> (Vec<ModelConfig>, MergeStats) {
    let mut seen: HashSet<&str> = existing
        .iter()
        .map(|m| m.tag.as_str())
        .filter(|t| !t.is_empty())
        .collect();

    let mut merged = existing.to_vec();
    let mut stats = MergeStats::default();
    for model in discovered {
        if model.tag.is_empty() || !seen.insert(model.tag.as_str()) {
            stats.skipped += 1;
            continue;
        }
        merged.push(model.clone());
        stats.added += 1;
    }
    (merged, stats)
}

/// Placeholder records for tags found on a controller: named after the tag,
/// typed `None` and inactive until someone configures them.
pub fn discovered_from_tags<I, S>(tags: I) -> Vec<ModelConfig>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|tag| {
            let tag = tag.as_ref();
            ModelConfig::new(tag, ModelKind::None)
                .with_tag(tag)
                .with_active(false)
        })
        .collect()
}
