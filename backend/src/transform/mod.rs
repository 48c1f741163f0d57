//! Record transformation.
//!
//! - `adapter`: RawArtist to ArtistRecord validation
//! - `name`: display name rewrite
//! - `tags`: tag name extraction
//! - `builder`: fail-fast collection build

pub mod adapter;
pub mod builder;
pub mod name;
pub mod tags;

pub use adapter::adapt;
pub use builder::build;
pub use name::transform_name;
pub use tags::collect_tag_names;
