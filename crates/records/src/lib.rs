//! Wire/boundary support for carelog patient records.
//!
//! This crate provides **wire models** and **format/translation helpers**
//! for on-disk patient record files:
//! - single patient resources (YAML)
//! - rosters holding a whole patient store (YAML)
//!
//! This crate focuses on:
//! - serialisation/deserialisation with strict schemas
//! - translation between the domain types in `carelog-core` and wire
//!   structs
//!
//! Domain rules (duplicate prevention, compatibility, validation at
//! registration) stay in `carelog-core`; nothing here re-runs them beyond
//! what reconstruction requires.

pub mod patient;
pub mod roster;

// Re-export facades
pub use patient::PatientResource;
pub use roster::Roster;

/// Errors returned by the `records` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum RecordsError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("translation error: {0}")]
    Translation(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(String),
}

/// Type alias for Results that can fail with a [`RecordsError`].
pub type RecordsResult<T> = Result<T, RecordsError>;
