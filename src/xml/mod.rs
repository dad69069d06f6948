//! XML comparison for asserting on SOAP payloads.
//!
//! # Data Flow
//! ```text
//! actual bytes, expected bytes
//!     → canonical.rs (parse, normalize, render line per element)
//!     → compare.rs (first differing line, or which side failed to parse)
//! ```

pub mod canonical;
pub mod compare;

pub use canonical::{canonicalize, XmlError};
pub use compare::{
    compare_xml, first_difference, xml_buffer_compare, LineDifference, XmlMismatch,
    END_OF_DOCUMENT,
};
