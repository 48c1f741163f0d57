//! Error types for the areasearch pipeline.
//!
//! Each stage owns its own error enum:
//!
//! - [`RecordError`] - malformed raw artist records (build stage)
//! - [`ExportError`] - table/tree serialization and file writes
//! - [`SearchError`] - MusicBrainz transport failures
//! - [`PipelineError`] - top-level wrapper used by the CLI
//!
//! Error conversion into [`PipelineError`] is automatic via `From`
//! implementations, allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Record Errors
// =============================================================================

/// Errors while adapting raw artist records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A required field is structurally absent from the raw record.
    #[error("Malformed artist record at index {index}: missing field '{field}'")]
    MalformedRecord { index: usize, field: String },
}

impl RecordError {
    pub fn missing(index: usize, field: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            field: field.into(),
        }
    }

    /// Re-anchor the error to a record's position in the input sequence.
    pub fn at(self, index: usize) -> Self {
        match self {
            Self::MalformedRecord { field, .. } => Self::MalformedRecord { index, field },
        }
    }
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while serializing or writing an export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create, write or sync the temporary output file.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to move the finished temporary file over the destination.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML serialization or parsing failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(String),
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

// =============================================================================
// Search Errors
// =============================================================================

/// Errors from the MusicBrainz search collaborator.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The service answered with a non-success status.
    #[error("{status} {reason}")]
    Transport { status: u16, reason: String },

    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The response body is not a search result document.
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    /// The area query is empty after trimming.
    #[error("Area query is empty")]
    EmptyQuery,
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors, used where stages are chained with `?`.
///
/// The pipeline driver itself reports per-stage outcomes in
/// [`crate::pipeline::PipelineReport`] instead of collapsing them into one
/// error; this type serves the CLI and offline helpers.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Build stage error.
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Export error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Search error.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for record adaptation.
pub type RecordResult<T> = Result<T, RecordError>;

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
