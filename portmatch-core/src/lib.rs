//! Shared data model for comparing storefront libraries against the
//! PortMaster catalog.
//!
//! Library and catalog adapters produce these types; the matcher and the
//! report layer consume them. Nothing here performs I/O.

pub mod entry;
pub mod storefront;

pub use entry::{CatalogEntry, ImageRef, LibraryEntry};
pub use storefront::{Storefront, StorefrontParseError};
