//! MusicBrainz artist search.
//!
//! The pipeline only sees the [`ArtistSource`] trait; [`MusicBrainzClient`]
//! is the production implementation.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use areasearch::search::{ArtistSource, MusicBrainzClient};
//! use areasearch::SearchConfig;
//!
//! let client = MusicBrainzClient::new(SearchConfig::from_env())?;
//! let artists = client.search("Toronto").await?;
//! ```

use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::logs::{log_info, log_success};
use crate::models::RawArtist;

/// Anything that can list the artists of an area.
#[allow(async_fn_in_trait)]
pub trait ArtistSource {
    async fn search(&self, area: &str) -> SearchResult<Vec<RawArtist>>;
}

/// Envelope of a `/ws/2/artist` search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    artists: Vec<RawArtist>,
}

/// Decode a search response body.
///
/// A body without an `artists` array is treated as an empty result.
pub fn parse_search_response(body: &str) -> SearchResult<Vec<RawArtist>> {
    serde_json::from_str::<SearchResponse>(body)
        .map(|response| response.artists)
        .map_err(|e| SearchError::InvalidResponse(e.to_string()))
}

/// Lucene query matching artists whose area is exactly `area`.
///
/// The area is trimmed and wrapped in double quotes so that multi-word
/// names are searched as a phrase.
pub fn area_query(area: &str) -> SearchResult<String> {
    let area = area.trim();
    if area.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(format!("area:\"{}\"", area.replace('"', "\\\"")))
}

/// HTTP client for the MusicBrainz web service
#[derive(Clone)]
pub struct MusicBrainzClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl MusicBrainzClient {
    pub fn new(config: SearchConfig) -> SearchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create a client from `MUSICBRAINZ_*` environment variables
    pub fn from_env() -> SearchResult<Self> {
        Self::new(SearchConfig::from_env())
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Endpoint for artist searches.
    pub fn artist_endpoint(&self) -> String {
        format!("{}/artist/", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the search request for one area (first page only).
    pub fn build_request(&self, area: &str) -> SearchResult<reqwest::Request> {
        let query = area_query(area)?;
        let limit = self.config.limit.to_string();

        self.http
            .get(self.artist_endpoint())
            .query(&[
                ("query", query.as_str()),
                ("limit", limit.as_str()),
                ("offset", "0"),
                ("fmt", "json"),
            ])
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json")
            .build()
            .map_err(|e| SearchError::Request(e.to_string()))
    }
}

impl ArtistSource for MusicBrainzClient {
    async fn search(&self, area: &str) -> SearchResult<Vec<RawArtist>> {
        let request = self.build_request(area)?;
        log_info(format!("🔎 Searching MusicBrainz for artists in \"{}\"...", area.trim()));

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Transport {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Request(e.to_string()))?;

        let artists = parse_search_response(&body)?;
        log_success(format!("Received {} artists", artists.len()));
        Ok(artists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "created": "2024-01-01T00:00:00.000Z",
        "count": 2,
        "offset": 0,
        "artists": [
            {
                "id": "A1",
                "type": "Group",
                "score": 100,
                "name": "Toronto",
                "tags": [{"count": 1, "name": "rock"}, {"count": 2, "name": "indie"}]
            },
            {"id": "A2", "score": 90, "name": "Oslo"}
        ]
    }"#;

    #[test]
    fn test_parse_search_response() {
        let artists = parse_search_response(RESPONSE).unwrap();
        assert_eq!(artists.len(), 2);
        assert_eq!(
            artists[0],
            RawArtist {
                name: Some("Toronto".into()),
                id: Some("A1".into()),
                tags: Some(vec![
                    crate::models::RawTag { name: Some("rock".into()), count: Some(1) },
                    crate::models::RawTag { name: Some("indie".into()), count: Some(2) },
                ]),
            }
        );
        assert_eq!(artists[1], RawArtist::new("Oslo", "A2"));
    }

    #[test]
    fn test_parse_without_artists() {
        assert!(parse_search_response(r#"{"count": 0}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_body() {
        let err = parse_search_response("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SearchError::InvalidResponse(_)));
    }

    #[test]
    fn test_area_query() {
        assert_eq!(area_query("  New York City ").unwrap(), "area:\"New York City\"");
        assert_eq!(area_query("a\"b").unwrap(), "area:\"a\\\"b\"");
        assert!(matches!(area_query("   "), Err(SearchError::EmptyQuery)));
    }

    #[test]
    fn test_build_request() {
        let client = MusicBrainzClient::new(SearchConfig::default().with_limit(25)).unwrap();
        let request = client.build_request(" Los Angeles ").unwrap();
        let url = request.url();

        assert_eq!(url.path(), "/ws/2/artist/");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("query".into(), "area:\"Los Angeles\"".into()),
                ("limit".into(), "25".into()),
                ("offset".into(), "0".into()),
                ("fmt".into(), "json".into()),
            ]
        );
        let agent = request.headers().get(USER_AGENT).unwrap().to_str().unwrap();
        assert!(agent.starts_with("areasearch/"));
    }

    #[test]
    fn test_build_request_rejects_blank_area() {
        let client = MusicBrainzClient::new(SearchConfig::default()).unwrap();
        assert!(matches!(client.build_request(""), Err(SearchError::EmptyQuery)));
    }

    #[test]
    fn test_artist_endpoint_normalizes_slash() {
        let mut config = SearchConfig::default();
        config.base_url = "http://localhost:5000/ws/2".into();
        let client = MusicBrainzClient::new(config).unwrap();
        assert_eq!(client.artist_endpoint(), "http://localhost:5000/ws/2/artist/");
    }
}
