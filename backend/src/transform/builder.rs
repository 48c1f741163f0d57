//! Build the frozen artist collection from raw search results.
//!
//! The build is fail-fast: the first malformed record aborts it, since a
//! partial collection would under-report results in both exports.

use super::adapter::adapt;
use crate::error::RecordResult;
use crate::models::{ArtistCollection, RawArtist};

/// Adapt every raw artist in order.
///
/// # Errors
/// [`crate::RecordError::MalformedRecord`] with the index of the first
/// offending record. No collection is returned in that case.
pub fn build(raw: &[RawArtist]) -> RecordResult<ArtistCollection> {
    let records = raw
        .iter()
        .enumerate()
        .map(|(index, artist)| adapt(artist).map_err(|e| e.at(index)))
        .collect::<RecordResult<Vec<_>>>()?;

    Ok(ArtistCollection::from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecordError;

    #[test]
    fn test_build_preserves_order() {
        let raw = vec![
            RawArtist::new("Toronto", "A1").with_tags(["rock", "indie"]),
            RawArtist::new("Oslo", "A2"),
            RawArtist::new("Rush", "A3").with_tags(["prog"]),
        ];
        let collection = build(&raw).unwrap();

        assert_eq!(collection.len(), 3);
        let ids: Vec<&str> = collection.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["A1", "A2", "A3"]);
        assert_eq!(collection.as_slice()[1].display_name(), "^sl^");
        assert!(collection.as_slice()[1].tag_names().is_empty());
    }

    #[test]
    fn test_build_empty_input() {
        let collection = build(&[]).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_build_fails_fast_with_index() {
        let raw = vec![
            RawArtist::new("Toronto", "A1"),
            RawArtist {
                name: Some("Oslo".into()),
                id: None,
                tags: None,
            },
            RawArtist {
                name: None,
                id: None,
                tags: None,
            },
        ];
        let err = build(&raw).unwrap_err();
        assert_eq!(err, RecordError::missing(1, "id"));
    }
}
