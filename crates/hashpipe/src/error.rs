//! Error types for the hashing pipeline.
//!
//! This module defines the central [`Error`] enum, which captures every
//! failure the pipeline can report to a caller or observe internally.
//!
//! ## Error Cases
//! - `InvalidLength`: The input value is empty or longer than
//!   [`MAX_VALUE_LEN`](crate::MAX_VALUE_LEN) bytes.
//! - `AdmissionRejected`: The bounded queue is full; retry later.
//! - `NotFound`: No record is stored under the requested id (yet).
//! - `Conflict`: A record with the same id was already stored. Allocated ids
//!   are unique, so this indicates a broken invariant rather than bad input.
//! - `ShuttingDown`: The pipeline is draining and refuses new admissions.
//! - `InvalidConfig`: Construction parameters are out of range.

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Unified error type for the hashing pipeline.
#[derive(Clone, thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The input value length is outside the accepted range.
    #[error(
        "Unsupported input length: {length}. Must be at least {min} and no more than {max}.",
        min = crate::MIN_VALUE_LEN,
        max = crate::MAX_VALUE_LEN
    )]
    InvalidLength { length: usize },

    /// The queue is at capacity (or no longer consumed) and the record was not
    /// admitted.
    #[error("Too many pending items; try again later")]
    AdmissionRejected,

    /// No record exists for the id.
    #[error("Item with id {id} does not exist")]
    NotFound { id: u64 },

    /// A record with the id already exists.
    #[error("Item with id {id} already exists")]
    Conflict { id: u64 },

    /// The pipeline has started shutting down.
    #[error("Service is shutting down")]
    ShuttingDown,

    /// The pipeline configuration is invalid.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}
