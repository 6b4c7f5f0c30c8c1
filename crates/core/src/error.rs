//! Error taxonomy for the carelog domain core.
//!
//! Every error here is a deterministic rejection of invalid input at the
//! point of the failing call. There is no I/O in this crate, so there are no
//! infrastructure failures, nothing is retryable, and the store remains
//! usable after any rejection.

/// Errors that can occur when working with patient records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatientError {
    /// Returned when attempting to register a patient whose date of birth
    /// lies in the future.
    #[error("date of birth cannot be in the future")]
    FutureDateOfBirth,

    /// Returned when checking transfusion compatibility and either party's
    /// blood type is unknown.
    #[error("both patients must have a known blood type to check transfusion compatibility")]
    InvalidBloodTypeForTransfusion,
}

/// Errors that can occur when working with medications.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MedicationError {
    /// Returned when prescribing a medication the patient is already
    /// actively taking. Carries the offending medication name.
    #[error("medication {0} already prescribed and active")]
    DuplicateMedication(String),
}

/// Type alias for Results that can fail with a [`PatientError`].
pub type PatientResult<T> = Result<T, PatientError>;

/// Type alias for Results that can fail with a [`MedicationError`].
pub type MedicationResult<T> = Result<T, MedicationError>;
