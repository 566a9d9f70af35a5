//! Barcode-based record linkage between two catalogs.
//!
//! [`barcode`] turns raw multi-valued barcode fields into ordered entries;
//! [`link`] joins catalogs on those entries through a hash index and keeps
//! one edge per `(a_id, b_id)` pair.

pub mod barcode;
pub mod link;

pub use barcode::{codes, normalize, to_field, DEFAULT_DELIMITERS, MIN_BARCODE_LEN};
pub use link::{edges_by_source, link_table, CrossCatalogLinker, LinkFilter};
