//! Formatting-insensitive XML comparison.

use thiserror::Error;

use crate::xml::canonical::{canonicalize, XmlError};

/// Placeholder shown when one document has fewer lines than the other.
pub const END_OF_DOCUMENT: &str = "<end of document>";

/// First canonical line on which two documents disagree (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDifference {
    pub line: usize,
    pub actual: String,
    pub expected: String,
}

#[derive(Debug, Error)]
pub enum XmlMismatch {
    #[error("actual document is not well-formed: {0}")]
    InvalidActual(#[source] XmlError),

    #[error("expected document is not well-formed: {0}")]
    InvalidExpected(#[source] XmlError),

    #[error("documents differ at line {}\n  actual:   {}\n  expected: {}", .0.line, .0.actual, .0.expected)]
    Differs(LineDifference),
}

/// Compare two documents after canonicalization.
pub fn compare_xml(actual: &[u8], expected: &[u8]) -> Result<(), XmlMismatch> {
    let actual = canonicalize(actual).map_err(XmlMismatch::InvalidActual)?;
    let expected = canonicalize(expected).map_err(XmlMismatch::InvalidExpected)?;
    match first_difference(&actual, &expected) {
        Some(difference) => Err(XmlMismatch::Differs(difference)),
        None => Ok(()),
    }
}

/// `true` when the documents match; logs the mismatch otherwise.
pub fn xml_buffer_compare(actual: &[u8], expected: &[u8]) -> bool {
    match compare_xml(actual, expected) {
        Ok(()) => true,
        Err(mismatch) => {
            tracing::warn!("{mismatch}");
            false
        }
    }
}

pub fn first_difference(actual: &str, expected: &str) -> Option<LineDifference> {
    let mut actual_lines = actual.lines();
    let mut expected_lines = expected.lines();
    let mut line = 0;
    loop {
        line += 1;
        match (actual_lines.next(), expected_lines.next()) {
            (None, None) => return None,
            (a, e) if a == e => continue,
            (a, e) => {
                return Some(LineDifference {
                    line,
                    actual: a.unwrap_or(END_OF_DOCUMENT).to_string(),
                    expected: e.unwrap_or(END_OF_DOCUMENT).to_string(),
                })
            }
        }
    }
}
