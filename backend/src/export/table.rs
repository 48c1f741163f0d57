//! Flat table export (`artists.csv`).
//!
//! One line per artist, no header:
//!
//! ```text
//! T^r^nt^, A1, "rock, indie"
//! ^sl^, A2, 
//! ```
//!
//! With [`TableQuoting::Verbatim`] nothing is escaped, so a comma or a quote
//! inside a name or tag makes the line ambiguous for readers.
//! [`TableQuoting::Rfc4180`] writes the same three fields through the `csv`
//! crate with standard quoting instead.

use std::path::Path;

use super::sink::write_atomic;
use crate::config::TableQuoting;
use crate::error::{ExportError, ExportResult};
use crate::models::{ArtistCollection, ArtistRecord};

/// Separator between fields and between tag names in verbatim mode.
pub const FIELD_SEPARATOR: &str = ", ";

/// Tag field for verbatim mode: empty for no tags, otherwise the names
/// joined with `", "` inside one pair of double quotes.
pub fn quoted_tag_field(tag_names: &[String]) -> String {
    if tag_names.is_empty() {
        String::new()
    } else {
        format!("\"{}\"", tag_names.join(FIELD_SEPARATOR))
    }
}

fn verbatim_line(record: &ArtistRecord) -> String {
    format!(
        "{}{sep}{}{sep}{}\n",
        record.display_name(),
        record.id(),
        quoted_tag_field(record.tag_names()),
        sep = FIELD_SEPARATOR,
    )
}

fn render_rfc4180(collection: &ArtistCollection) -> ExportResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for record in collection {
        let tags = record.tag_names().join(FIELD_SEPARATOR);
        writer.write_record([record.display_name(), record.id(), tags.as_str()])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Csv(e.to_string()))
}

/// Render the whole table in memory.
pub fn render_table(collection: &ArtistCollection, quoting: TableQuoting) -> ExportResult<String> {
    match quoting {
        TableQuoting::Verbatim => Ok(collection.iter().map(verbatim_line).collect()),
        TableQuoting::Rfc4180 => render_rfc4180(collection),
    }
}

/// Render and write the table. Either every line lands in `path` or the
/// previous file is left untouched.
pub fn export_table(
    collection: &ArtistCollection,
    path: &Path,
    quoting: TableQuoting,
) -> ExportResult<()> {
    let table = render_table(collection, quoting)?;
    write_atomic(path, table.as_bytes())
}
