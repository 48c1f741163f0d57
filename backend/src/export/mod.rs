//! Dual-format export.
//!
//! Both exporters read the same frozen [`crate::ArtistCollection`] and share
//! nothing else, so they can run in either order.
//!
//! - `table`: delimited text, one line per artist
//! - `tree`: XML document, one `Artist` element per artist
//! - `sink`: atomic temp-file-and-rename writes

pub mod sink;
pub mod table;
pub mod tree;

pub use sink::write_atomic;
pub use table::{export_table, quoted_tag_field, render_table};
pub use tree::{export_tree, parse_tree, render_tree, ArtistNode};
