//! Error type for layout and document operations.
//!
//! Expected edge cases (an unknown current section, an empty canvas) are
//! reported as values by the resolver. The variants here cover invalid input
//! that the caller has to fix upstream.

use crate::doc::{ElementId, SectionId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// A coordinate or viewport height was NaN or infinite.
    #[error("non-finite coordinate: {0}")]
    NonFiniteCoordinate(f64),

    /// A section height was zero, negative, or non-finite.
    #[error("invalid height {height} for section {id}")]
    InvalidHeight { id: SectionId, height: f64 },

    /// A section order value was NaN or infinite.
    #[error("invalid order for section {id}")]
    InvalidOrder { id: SectionId },

    /// A section was submitted without an id.
    #[error("section id must not be empty")]
    EmptySectionId,

    /// A section with this id already exists.
    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),

    /// The referenced section does not exist.
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),

    /// An element with this id already exists.
    #[error("duplicate element id: {0}")]
    DuplicateElement(ElementId),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),
}

/// Reject NaN and infinite values before they reach the geometry.
pub(crate) fn ensure_finite(value: f64) -> Result<f64, LayoutError> {
    if value.is_finite() { Ok(value) } else { Err(LayoutError::NonFiniteCoordinate(value)) }
}
