//! Tag name extraction.

use crate::models::RawArtist;

/// Collect tag names in encounter order.
///
/// Absent or empty tag lists give an empty `Vec`. Duplicates and empty names
/// are passed through unchanged, and a tag without a `name` contributes an
/// empty name so the tag count is kept.
pub fn collect_tag_names(raw: &RawArtist) -> Vec<String> {
    raw.tags
        .iter()
        .flatten()
        .map(|tag| tag.name.clone().unwrap_or_default())
        .collect()
}
