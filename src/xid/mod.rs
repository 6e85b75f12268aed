//! Stable content reference (x-id) resolution
//!
//! Links that the classifier flags for resolution are matched against the
//! exported content collection's metadata files to recover the stable
//! reference the link should have used.
//!
//! # Components
//!
//! - `CollectionIndex`: every collection metadata file and its identifier
//! - `XidResolver`: exact then fuzzy matching of a link to one collection file
//! - `levenshtein`: the edit distance used to break filename ties

mod collection;
mod distance;
mod resolver;

pub use collection::{parse_identifier, CollectionFile, CollectionIndex};
pub use distance::levenshtein;
pub use resolver::{link_file_name, XidResolver};
