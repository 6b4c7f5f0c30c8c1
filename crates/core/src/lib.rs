//! # carelog core
//!
//! Domain core for the carelog patient record keeper:
//! - Patient registration with validated demographics
//! - Medication prescription with duplicate prevention and derived
//!   active/expiry state
//! - ABO/Rh blood-type donor compatibility
//! - An in-memory patient store keyed by medical record number
//!
//! Everything here is synchronous, in-memory, and single-owner. Operations
//! either return a value or fail immediately with a typed error; there is
//! no I/O and no global clock — time-dependent computations take an
//! explicit `now`.
//!
//! **No boundary concerns**: wire formats live in the `records` crate and
//! user interaction in `carelog-cli`.

pub mod blood_type;
pub mod error;
pub mod medication;
pub mod patient;
pub mod store;

pub use blood_type::{BloodType, UnknownBloodType};
pub use error::{MedicationError, MedicationResult, PatientError, PatientResult};
pub use medication::{
    Dosage, DosageUnit, Medication, MedicationRoute, UnknownDosageUnit, UnknownRoute,
};
pub use patient::Patient;
pub use store::PatientStore;
