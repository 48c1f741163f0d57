//! Pipeline driver: build the collection once, then run both exporters.
//!
//! # Example
//!
//! ```rust,ignore
//! use areasearch::{MusicBrainzClient, Pipeline, PipelineConfig, SearchConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MusicBrainzClient::new(SearchConfig::from_env())?;
//!     let pipeline = Pipeline::new(PipelineConfig::default());
//!
//!     let report = pipeline.search_and_run(&client, "Toronto").await?;
//!     println!("table: {:?}", report.table);
//!     Ok(())
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::error::{
    ExportError, PipelineError, PipelineResult, RecordError, SearchError, SearchResult,
};
use crate::export::{export_table, export_tree};
use crate::logs::{LogBroadcaster, LogEntry, LOG_BROADCASTER};
use crate::models::{ArtistCollection, RawArtist};
use crate::search::{parse_search_response, ArtistSource};
use crate::transform::build;

/// Outcome of one pipeline stage.
#[derive(Debug)]
pub enum StageOutcome<T, E> {
    Succeeded(T),
    Failed(E),
    /// Not attempted because an earlier stage failed.
    Skipped,
}

impl<T, E> StageOutcome<T, E> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T, E> From<Result<T, E>> for StageOutcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Per-stage results of one run. Partial success (table written, tree
/// failed) is visible here; deciding an exit code is up to the caller.
#[derive(Debug)]
pub struct PipelineReport {
    /// Number of records built.
    pub build: StageOutcome<usize, RecordError>,
    /// Path of the written table.
    pub table: StageOutcome<PathBuf, ExportError>,
    /// Path of the written tree document.
    pub tree: StageOutcome<PathBuf, ExportError>,
}

impl PipelineReport {
    /// True when every stage succeeded.
    pub fn is_success(&self) -> bool {
        self.build.is_success() && self.table.is_success() && self.tree.is_success()
    }
}

/// Sequences build, table export and tree export.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    logs: LogBroadcaster,
}

impl Pipeline {
    /// Pipeline reporting to the global broadcaster.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            logs: LOG_BROADCASTER.clone(),
        }
    }

    /// Report stage entries to `logs` instead of the global broadcaster.
    pub fn with_logs(mut self, logs: LogBroadcaster) -> Self {
        self.logs = logs;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Build the collection and, if that succeeds, attempt both exports.
    ///
    /// A malformed record skips both exports, so nothing is written.
    pub fn run(&self, raw: &[RawArtist]) -> PipelineReport {
        self.logs
            .log(LogEntry::info(format!("⚙️  Building {} artist records...", raw.len())));

        let collection = match build(raw) {
            Ok(collection) => collection,
            Err(err) => {
                self.logs.log(LogEntry::error(err.to_string()));
                self.logs.log(LogEntry::warning("Nothing exported").with_indent(1));
                return PipelineReport {
                    build: StageOutcome::Failed(err),
                    table: StageOutcome::Skipped,
                    tree: StageOutcome::Skipped,
                };
            }
        };
        self.logs
            .log(LogEntry::success(format!("Built {} records", collection.len())));

        let (table, tree) = self.export(&collection);
        PipelineReport {
            build: StageOutcome::Succeeded(collection.len()),
            table,
            tree,
        }
    }

    /// Run both exporters on a frozen collection. A failure in one does not
    /// prevent the other.
    pub fn export(
        &self,
        collection: &ArtistCollection,
    ) -> (
        StageOutcome<PathBuf, ExportError>,
        StageOutcome<PathBuf, ExportError>,
    ) {
        let table_path = &self.config.table_path;
        self.logs
            .log(LogEntry::info(format!("📄 Writing table to {}...", table_path.display())));
        let table = export_table(collection, table_path, self.config.quoting)
            .map(|()| table_path.clone());
        self.report_export("Table", &table);

        let tree_path = &self.config.tree_path;
        self.logs
            .log(LogEntry::info(format!("🌳 Writing tree to {}...", tree_path.display())));
        let tree = export_tree(collection, tree_path).map(|()| tree_path.clone());
        self.report_export("Tree", &tree);

        (table.into(), tree.into())
    }

    /// Search one area and run the pipeline on the results.
    ///
    /// Transport failures are returned unchanged and nothing is written.
    pub async fn search_and_run<S: ArtistSource>(
        &self,
        source: &S,
        area: &str,
    ) -> SearchResult<PipelineReport> {
        let raw = source.search(area).await?;
        Ok(self.run(&raw))
    }

    fn report_export(&self, label: &str, result: &Result<PathBuf, ExportError>) {
        let entry = match result {
            Ok(path) => LogEntry::success(format!("{} written: {}", label, path.display())),
            Err(err) => LogEntry::error(format!("{} export failed: {}", label, err)),
        };
        self.logs.log(entry.with_indent(1));
    }
}

/// Load raw artists from a saved search response.
///
/// Accepts the service's `{"artists": [...]}` envelope or a bare array.
pub fn read_raw_artists(path: &Path) -> PipelineResult<Vec<RawArtist>> {
    let content = fs::read_to_string(path).map_err(|source| PipelineError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    if content.trim_start().starts_with('[') {
        return serde_json::from_str(&content)
            .map_err(|e| PipelineError::Search(SearchError::InvalidResponse(e.to_string())));
    }
    Ok(parse_search_response(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableQuoting;
    use crate::export::parse_tree;
    use crate::logs::LogLevel;
    use tokio::sync::broadcast;

    struct StaticSource(Vec<RawArtist>);

    impl ArtistSource for StaticSource {
        async fn search(&self, _area: &str) -> SearchResult<Vec<RawArtist>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl ArtistSource for FailingSource {
        async fn search(&self, _area: &str) -> SearchResult<Vec<RawArtist>> {
            Err(SearchError::Transport {
                status: 503,
                reason: "Service Unavailable".into(),
            })
        }
    }

    fn scenario() -> Vec<RawArtist> {
        vec![
            RawArtist::new("Toronto", "A1").with_tags(["rock", "indie"]),
            RawArtist::new("Oslo", "A2"),
        ]
    }

    fn pipeline_in(dir: &Path) -> Pipeline {
        Pipeline::new(PipelineConfig::new(
            dir.join("artists.csv"),
            dir.join("artists.xml"),
        ))
    }

    fn drain(rx: &mut broadcast::Receiver<LogEntry>) -> Vec<LogEntry> {
        std::iter::from_fn(|| rx.try_recv().ok()).collect()
    }

    fn levels(entries: &[LogEntry]) -> Vec<LogLevel> {
        entries.iter().map(|e| e.level.clone()).collect()
    }

    #[test]
    fn test_run_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(dir.path());

        let report = pipeline.run(&scenario());

        assert!(report.is_success());
        assert_eq!(report.build.value(), Some(&2));
        let table = fs::read_to_string(dir.path().join("artists.csv")).unwrap();
        assert_eq!(table, "T^r^nt^, A1, \"rock, indie\"\n^sl^, A2, \n");

        let xml = fs::read_to_string(dir.path().join("artists.xml")).unwrap();
        let nodes = parse_tree(&xml).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].tags(), ["rock", "indie"]);
        assert!(nodes[1].tags().is_empty());
    }

    #[test]
    fn test_missing_id_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(dir.path());
        let mut raw = scenario();
        raw[1].id = None;

        let report = pipeline.run(&raw);

        assert_eq!(
            report.build.error(),
            Some(&RecordError::missing(1, "id"))
        );
        assert!(matches!(report.table, StageOutcome::Skipped));
        assert!(matches!(report.tree, StageOutcome::Skipped));
        assert!(!dir.path().join("artists.csv").exists());
        assert!(!dir.path().join("artists.xml").exists());
    }

    #[test]
    fn test_run_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_in(dir.path());
        let table_path = dir.path().join("artists.csv");
        let tree_path = dir.path().join("artists.xml");

        assert!(pipeline.run(&scenario()).is_success());
        let first = (fs::read(&table_path).unwrap(), fs::read(&tree_path).unwrap());
        assert!(pipeline.run(&scenario()).is_success());
        let second = (fs::read(&table_path).unwrap(), fs::read(&tree_path).unwrap());

        assert_eq!(first, second);
    }

    #[test]
    fn test_table_failure_does_not_stop_tree() {
        let dir = tempfile::tempdir().unwrap();
        let table_path = dir.path().join("artists.csv");
        fs::create_dir(&table_path).unwrap();
        let pipeline = pipeline_in(dir.path());

        let report = pipeline.run(&scenario());

        assert!(report.build.is_success());
        assert!(report.table.is_failed());
        assert!(report.tree.is_success());
        assert!(!report.is_success());
        assert!(table_path.is_dir());
        assert!(dir.path().join("artists.xml").is_file());
    }

    #[test]
    fn test_tree_failure_does_not_undo_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("artists.xml")).unwrap();
        let pipeline = pipeline_in(dir.path());

        let report = pipeline.run(&scenario());

        assert!(report.table.is_success());
        assert!(report.tree.is_failed());
        assert!(dir.path().join("artists.csv").is_file());
    }

    #[test]
    fn test_control_character_fails_only_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let raw = vec![RawArtist::new("Bell\u{7}", "A1")];

        let report = pipeline_in(dir.path()).run(&raw);

        assert!(report.table.is_success());
        assert!(matches!(report.tree.error(), Some(ExportError::Xml(_))));
        assert!(!dir.path().join("artists.xml").exists());
    }

    #[test]
    fn test_stage_entries_for_successful_run() {
        let dir = tempfile::tempdir().unwrap();
        let logs = LogBroadcaster::new();
        let mut rx = logs.subscribe();

        assert!(pipeline_in(dir.path()).with_logs(logs).run(&scenario()).is_success());

        let entries = drain(&mut rx);
        assert_eq!(
            levels(&entries),
            vec![
                LogLevel::Info,
                LogLevel::Success,
                LogLevel::Info,
                LogLevel::Success,
                LogLevel::Info,
                LogLevel::Success,
            ]
        );
        assert_eq!(entries[1].message, "Built 2 records");
        assert!(entries[3].message.starts_with("Table written: "));
        assert!(entries[5].message.starts_with("Tree written: "));
        assert_eq!(entries[3].indent, 1);
        assert_eq!(entries[5].indent, 1);
    }

    #[test]
    fn test_stage_entries_for_failed_build() {
        let dir = tempfile::tempdir().unwrap();
        let logs = LogBroadcaster::new();
        let mut rx = logs.subscribe();
        let mut raw = scenario();
        raw[0].name = None;

        pipeline_in(dir.path()).with_logs(logs).run(&raw);

        let entries = drain(&mut rx);
        assert_eq!(
            levels(&entries),
            vec![LogLevel::Info, LogLevel::Error, LogLevel::Warning]
        );
        assert_eq!(entries[1].message, RecordError::missing(0, "name").to_string());
        assert_eq!(entries[2].message, "Nothing exported");
        assert!(!entries.iter().any(|e| e.message.contains("Writing")));
    }

    #[test]
    fn test_failed_export_is_reported_per_stage() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("artists.csv")).unwrap();
        let logs = LogBroadcaster::new();
        let mut rx = logs.subscribe();

        pipeline_in(dir.path()).with_logs(logs).run(&scenario());

        let entries = drain(&mut rx);
        let table = entries
            .iter()
            .find(|e| e.message.starts_with("Table export failed"))
            .unwrap();
        assert_eq!(table.level, LogLevel::Error);
        assert_eq!(table.indent, 1);
        assert!(entries.iter().any(|e| e.level == LogLevel::Success
            && e.message.starts_with("Tree written: ")));
    }

    #[test]
    fn test_rfc4180_config() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Pipeline::new(
            PipelineConfig::new(dir.path().join("a.csv"), dir.path().join("a.xml"))
                .with_quoting(TableQuoting::Rfc4180),
        );

        assert!(pipeline.run(&scenario()).is_success());
        let table = fs::read_to_string(dir.path().join("a.csv")).unwrap();
        assert_eq!(table, "T^r^nt^,A1,\"rock, indie\"\n^sl^,A2,\n");
    }

    #[test]
    fn test_empty_result_set() {
        let dir = tempfile::tempdir().unwrap();
        let report = pipeline_in(dir.path()).run(&[]);

        assert!(report.is_success());
        assert_eq!(fs::read_to_string(dir.path().join("artists.csv")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_search_and_run() {
        let dir = tempfile::tempdir().unwrap();
        let report = pipeline_in(dir.path())
            .search_and_run(&StaticSource(scenario()), "Toronto")
            .await
            .unwrap();

        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_transport_error_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline_in(dir.path())
            .search_and_run(&FailingSource, "Toronto")
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "503 Service Unavailable");
        assert!(!dir.path().join("artists.csv").exists());
    }

    #[test]
    fn test_read_raw_artists_envelope_and_array() {
        let dir = tempfile::tempdir().unwrap();
        let envelope = dir.path().join("response.json");
        fs::write(&envelope, r#"{"artists":[{"id":"A2","name":"Oslo"}]}"#).unwrap();
        let array = dir.path().join("artists.json");
        fs::write(&array, r#"[{"id":"A2","name":"Oslo"}]"#).unwrap();

        assert_eq!(read_raw_artists(&envelope).unwrap(), vec![RawArtist::new("Oslo", "A2")]);
        assert_eq!(read_raw_artists(&array).unwrap(), vec![RawArtist::new("Oslo", "A2")]);
    }

    #[test]
    fn test_read_raw_artists_missing_file() {
        let err = read_raw_artists(Path::new("/nonexistent/response.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Input { .. }));
    }
}
