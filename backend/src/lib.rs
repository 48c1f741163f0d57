//! # Areasearch - artists of an area, exported as a table and an XML tree
//!
//! Areasearch asks MusicBrainz for the artists associated with a
//! geographic area, rewrites each artist's name, collects its tags and
//! writes the same data set twice: a flat delimited table and an XML tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ MusicBrainz │────▶│   Adapter   │────▶│  Collection │──┬─▶│ artists.csv │
//! │   search    │     │ (name/tags) │     │  (frozen)   │  │  └─────────────┘
//! └─────────────┘     └─────────────┘     └─────────────┘  │  ┌─────────────┐
//!                                                          └─▶│ artists.xml │
//!                                                             └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use areasearch::{Pipeline, PipelineConfig, RawArtist};
//!
//! let raw = vec![RawArtist::new("Toronto", "A1").with_tags(["rock", "indie"])];
//! let report = Pipeline::new(PipelineConfig::default()).run(&raw);
//! assert!(report.is_success());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - RawArtist, ArtistRecord, ArtistCollection
//! - [`transform`] - Adapter, name rewrite, tag collection, fail-fast build
//! - [`export`] - Table and tree exporters with atomic writes
//! - [`pipeline`] - Stage sequencing and per-stage report
//! - [`search`] - MusicBrainz client
//! - [`config`] - Search and pipeline settings
//! - [`logs`] - Status reporting

// Core modules
pub mod error;
pub mod models;

// Transformation
pub mod transform;

// Export
pub mod export;

// Orchestration
pub mod pipeline;

// Collaborators
pub mod config;
pub mod logs;
pub mod search;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ExportError, PipelineError, RecordError, SearchError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ArtistCollection, ArtistRecord, RawArtist, RawTag};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{adapt, build, collect_tag_names, transform_name};

// =============================================================================
// Re-exports - Export
// =============================================================================

pub use export::{
    export_table, export_tree, parse_tree, quoted_tag_field, render_table, render_tree,
    write_atomic, ArtistNode,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{read_raw_artists, Pipeline, PipelineReport, StageOutcome};

// =============================================================================
// Re-exports - Config & Search
// =============================================================================

pub use config::{PipelineConfig, SearchConfig, TableQuoting};
pub use search::{area_query, parse_search_response, ArtistSource, MusicBrainzClient};
