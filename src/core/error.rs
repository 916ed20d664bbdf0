//! Core capability errors (parsing, validation).
//!
//! These are bounded and stable: core errors represent domain/refusal states,
//! not library implementation details.

use thiserror::Error;

/// Invalid `major.minor` version string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("version `{raw}` is invalid: expected <major>.<minor>")]
pub struct InvalidMajorMinor {
    pub raw: String,
}

/// Invalid calendar date string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("date `{raw}` is invalid: {reason}")]
pub struct InvalidDate {
    pub raw: String,
    pub reason: String,
}

/// Invalid digest-pinned image reference.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("image reference `{raw}` is invalid: {reason}")]
pub struct InvalidReference {
    pub raw: String,
    pub reason: String,
}

/// Lifecycle dates violate their required ordering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "dates out of order: expected order is full support, maintenance, extensions (in order), end of life"
)]
pub struct DatesOutOfOrder;

/// Canonical error enum for the core capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    MajorMinor(#[from] InvalidMajorMinor),
    #[error(transparent)]
    Date(#[from] InvalidDate),
    #[error(transparent)]
    Reference(#[from] InvalidReference),
    #[error(transparent)]
    DateOrder(#[from] DatesOutOfOrder),
}
