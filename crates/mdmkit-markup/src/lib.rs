//! mdmkit-markup
//!
//! The markup seam around the MDM document model:
//! - the [`ParsedElement`] abstraction an external parser supplies (ordered
//!   attributes, ordered children) and its owned [`Element`] implementation
//! - the reader that builds every model node from parsed elements
//! - the writer that reconstructs element trees, preserving active/deleted
//!   partitioning and order for round-trips
//!
//! No text parsing happens here; the markup grammar belongs to the caller.

pub mod element;
pub mod options;
pub mod reader;
pub mod writer;

pub use element::{Element, ParsedElement};
pub use options::{OptionsError, ReaderOptions, UnknownNodePolicy};
pub use reader::{DocumentReader, ReadError, ReadWarning};
pub use writer::{
    write_categories, write_document, write_field, write_pages, write_properties,
    write_property_collection, write_routings, write_subfields,
};
