//! Error types for mapping operations
//!
//! Every failure in this crate is local and synchronous: it surfaces to the
//! direct caller of the operation that detected it. There is no retry and no
//! background error channel.
//!
//! ## Taxonomy
//!
//! - **Domain errors** ([`MappingError::MissingTimeDimension`],
//!   [`MappingError::NoOuterDimension`], [`MappingError::DomainMismatch`]):
//!   the caller combined things that cannot be combined. These are programmer
//!   errors, reported at the boundary where they are detected.
//! - **Exhausted iteration** ([`MappingError::NoNextPosition`]): `next()` or
//!   `next_position()` was called although `has_next()` is false. Check
//!   `has_next()` first.

use crate::dimension::DimensionSet;

/// Result type for mapping operations
pub type MappingResult<T> = Result<T, MappingError>;

/// Errors that can occur while building, iterating or combining mappings
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MappingError {
    #[error("Domain {0} does not contain the time dimension")]
    MissingTimeDimension(DimensionSet),

    #[error("Domain {0} has no dimension besides time")]
    NoOuterDimension(DimensionSet),

    #[error("Domain mismatch: expected {expected} (or a simple subset of it), got {found}")]
    DomainMismatch {
        expected: DimensionSet,
        found: DimensionSet,
    },

    #[error("Iterator has no next position")]
    NoNextPosition,

    #[error("Discontinuity limit time {0} equals the discontinuity position")]
    InvalidDiscontinuity(f64),
}
