//! Domain models for the areasearch pipeline.
//!
//! - [`RawArtist`] / [`RawTag`] - artist records as MusicBrainz returns them
//! - [`ArtistRecord`] - validated, immutable artist
//! - [`ArtistCollection`] - frozen, ordered set of records for one run

use serde::{Deserialize, Serialize};

// =============================================================================
// Raw input
// =============================================================================

/// One tag attached to a raw artist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTag {
    /// Tag text. Required by the adapter, optional here so a missing name
    /// surfaces as a malformed record rather than a decode failure.
    #[serde(default)]
    pub name: Option<String>,
    /// Vote count reported by MusicBrainz.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
}

impl RawTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            count: None,
        }
    }
}

/// An artist record as received from the search service.
///
/// Every field is optional at this layer; `null` and absent are treated the
/// same. Unknown fields (type, score, country, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawArtist {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<RawTag>>,
}

impl RawArtist {
    /// Create a raw artist with a name, an id and no tags.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            id: Some(id.into()),
            tags: None,
        }
    }

    /// Attach tags by name.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(RawTag::new).collect());
        self
    }
}

// =============================================================================
// Artist Record
// =============================================================================

/// A validated artist. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistRecord {
    display_name: String,
    id: String,
    tag_names: Vec<String>,
}

impl ArtistRecord {
    pub(crate) fn new(display_name: String, id: String, tag_names: Vec<String>) -> Self {
        Self {
            display_name,
            id,
            tag_names,
        }
    }

    /// Transformed artist name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// MusicBrainz identifier, verbatim.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Tag names in source order. Empty when the artist has no tags.
    pub fn tag_names(&self) -> &[String] {
        &self.tag_names
    }
}

// =============================================================================
// Artist Collection
// =============================================================================

/// Ordered records for one pipeline run, in arrival order.
///
/// Only the record builder creates collections, and there is no way to
/// modify one afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ArtistCollection {
    records: Vec<ArtistRecord>,
}

impl ArtistCollection {
    pub(crate) fn from_records(records: Vec<ArtistRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtistRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ArtistRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ArtistCollection {
    type Item = &'a ArtistRecord;
    type IntoIter = std::slice::Iter<'a, ArtistRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_artist_ignores_unknown_fields() {
        let raw: RawArtist = serde_json::from_str(
            r#"{"id":"A1","type":"Group","score":100,"name":"Rush","country":"CA"}"#,
        )
        .unwrap();
        assert_eq!(raw, RawArtist::new("Rush", "A1"));
    }

    #[test]
    fn test_raw_artist_null_is_absent() {
        let raw: RawArtist = serde_json::from_str(r#"{"name":null,"id":"A1","tags":null}"#).unwrap();
        assert!(raw.name.is_none());
        assert!(raw.tags.is_none());
    }

    #[test]
    fn test_raw_tag_count() {
        let raw: RawArtist = serde_json::from_str(
            r#"{"name":"Rush","id":"A1","tags":[{"count":3,"name":"rock"}]}"#,
        )
        .unwrap();
        let tags = raw.tags.unwrap();
        assert_eq!(tags[0].name.as_deref(), Some("rock"));
        assert_eq!(tags[0].count, Some(3));
    }

    #[test]
    fn test_record_serialization() {
        let record = ArtistRecord::new("R^sh".into(), "A1".into(), vec!["rock".into()]);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"displayName\":\"R^sh\""));
        assert!(json.contains("\"tagNames\":[\"rock\"]"));
    }
}
