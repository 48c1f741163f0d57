//! Validation of raw artist records.
//!
//! This is the only place that looks at [`RawArtist`]; everything downstream
//! works on [`ArtistRecord`].

use super::name::transform_name;
use super::tags::collect_tag_names;
use crate::error::{RecordError, RecordResult};
use crate::models::{ArtistRecord, RawArtist};

/// Adapt one raw artist into a validated record.
///
/// `name` and `id` must be present (empty strings are accepted). Tags are
/// optional. Errors carry index 0; use [`RecordError::at`] to place them.
pub fn adapt(raw: &RawArtist) -> RecordResult<ArtistRecord> {
    let name = raw
        .name
        .as_deref()
        .ok_or_else(|| RecordError::missing(0, "name"))?;
    let id = raw
        .id
        .clone()
        .ok_or_else(|| RecordError::missing(0, "id"))?;
    let tag_names = collect_tag_names(raw);

    Ok(ArtistRecord::new(transform_name(name), id, tag_names))
}
