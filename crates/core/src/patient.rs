//! Patient records.
//!
//! A [`Patient`] owns its medication history exclusively: prescriptions are
//! appended via [`Patient::prescribe`] (which enforces the
//! one-active-course-per-name rule) and deleted via
//! [`Patient::remove_medication`]. Everything time-dependent takes an
//! explicit `now` so the clock stays under the caller's control.

use std::fmt::Write as _;
use std::hash::{Hash, Hasher};

use carelog_types::NonEmptyText;
use chrono::{DateTime, Datelike, Utc};
use uuid::Uuid;

use crate::error::{MedicationError, MedicationResult, PatientError, PatientResult};
use crate::{BloodType, Medication};

/// A patient record.
///
/// The medical record number is assigned at registration, never changes,
/// and is the sole identity and equality key: two `Patient` values compare
/// equal iff their MRNs match, whatever the other fields say. Demographic
/// fields are plain public data the owning caller may update; change
/// notification is the caller's concern, not this type's.
#[derive(Clone, Debug)]
pub struct Patient {
    medical_record_number: Uuid,

    /// The patient's first name.
    pub first_name: NonEmptyText,

    /// The patient's family name.
    pub last_name: NonEmptyText,

    /// The patient's date of birth. Validated against `now` once, at
    /// registration; not re-checked on later updates.
    pub date_of_birth: DateTime<Utc>,

    /// The patient's height in millimetres.
    pub height_mm: u32,

    /// The patient's weight in grams.
    pub weight_g: u32,

    /// The patient's blood type, if known.
    pub blood_type: Option<BloodType>,

    medications: Vec<Medication>,
}

impl Patient {
    /// Registers a new patient, assigning a fresh medical record number and
    /// an empty medication history.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::FutureDateOfBirth`] if `date_of_birth` lies
    /// after `now`.
    pub fn new(
        first_name: NonEmptyText,
        last_name: NonEmptyText,
        date_of_birth: DateTime<Utc>,
        height_mm: u32,
        weight_g: u32,
        blood_type: Option<BloodType>,
        now: DateTime<Utc>,
    ) -> PatientResult<Self> {
        if date_of_birth > now {
            return Err(PatientError::FutureDateOfBirth);
        }
        Ok(Self {
            medical_record_number: Uuid::new_v4(),
            first_name,
            last_name,
            date_of_birth,
            height_mm,
            weight_g,
            blood_type,
            medications: Vec::new(),
        })
    }

    /// Reconstructs a patient record with a known medical record number and
    /// medication history.
    ///
    /// Intended for the wire layer. The future-date-of-birth check is not
    /// repeated here: that invariant applies at first registration only.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        medical_record_number: Uuid,
        first_name: NonEmptyText,
        last_name: NonEmptyText,
        date_of_birth: DateTime<Utc>,
        height_mm: u32,
        weight_g: u32,
        blood_type: Option<BloodType>,
        medications: Vec<Medication>,
    ) -> Self {
        Self {
            medical_record_number,
            first_name,
            last_name,
            date_of_birth,
            height_mm,
            weight_g,
            blood_type,
            medications,
        }
    }

    /// The patient's medical record number.
    pub fn medical_record_number(&self) -> Uuid {
        self.medical_record_number
    }

    /// The full medication history, prescription order, including completed
    /// courses.
    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    /// `"Last name, First name (age in years)"`, as displayed in lists.
    ///
    /// Age is counted in whole calendar years between the date of birth and
    /// `now`.
    pub fn full_name_and_age(&self, now: DateTime<Utc>) -> String {
        let age = whole_years_between(self.date_of_birth, now);
        format!("{}, {} ({})", self.last_name, self.first_name, age)
    }

    /// The date of birth formatted as `YYYY-MM-DD`.
    pub fn date_of_birth_string(&self) -> String {
        self.date_of_birth.format("%Y-%m-%d").to_string()
    }

    /// The medications the patient is taking at `now`, oldest prescription
    /// first. Completed courses are excluded entirely.
    pub fn current_medications(&self, now: DateTime<Utc>) -> Vec<&Medication> {
        let mut current: Vec<&Medication> = self
            .medications
            .iter()
            .filter(|m| m.is_active(now))
            .collect();
        current.sort_by_key(|m| m.date_prescribed());
        current
    }

    /// The medications the patient is taking at `now`, newest prescription
    /// first.
    pub fn current_medications_newest_first(&self, now: DateTime<Utc>) -> Vec<&Medication> {
        let mut current = self.current_medications(now);
        current.reverse();
        current
    }

    /// Prescribes a medication, appending it to the history.
    ///
    /// The duplicate check compares names case-insensitively against
    /// *active* courses only; completed courses never block a new
    /// prescription. This check-then-append sequence is not atomic: if the
    /// record is ever shared across threads, calls must be serialised
    /// externally.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::DuplicateMedication`] if an active course
    /// with the same name already exists; the history is left unchanged.
    pub fn prescribe(&mut self, medication: Medication, now: DateTime<Utc>) -> MedicationResult<()> {
        let name = medication.name().as_str().to_lowercase();
        let duplicate = self
            .medications
            .iter()
            .any(|m| m.is_active(now) && m.name().as_str().to_lowercase() == name);
        if duplicate {
            return Err(MedicationError::DuplicateMedication(
                medication.name().as_str().to_string(),
            ));
        }
        self.medications.push(medication);
        Ok(())
    }

    /// Deletes the medication with the given identifier from the history.
    ///
    /// A no-op if no such medication exists.
    pub fn remove_medication(&mut self, id: Uuid) {
        let before = self.medications.len();
        self.medications.retain(|m| m.id() != id);
        if self.medications.len() == before {
            tracing::debug!("no medication with id {} to remove", id.simple());
        }
    }

    /// The donor blood types this patient can receive a transfusion from.
    ///
    /// Empty when the patient's blood type is unknown.
    pub fn compatible_donor_types(&self) -> &'static [BloodType] {
        match self.blood_type {
            Some(blood_type) => blood_type.compatible_donors(),
            None => &[],
        }
    }

    /// Whether this patient can receive blood from `donor`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidBloodTypeForTransfusion`] when either
    /// patient's blood type is unknown; callers should treat that as
    /// "unknown", not as a fault.
    pub fn can_receive_blood(&self, donor: &Patient) -> PatientResult<bool> {
        match (self.blood_type, donor.blood_type) {
            (Some(recipient_type), Some(donor_type)) => {
                Ok(recipient_type.can_receive_from(donor_type))
            }
            _ => Err(PatientError::InvalidBloodTypeForTransfusion),
        }
    }

    /// A multi-line summary of the record as shown on a detail view.
    ///
    /// Height and weight are stored in millimetres and grams but displayed
    /// in centimetres and kilograms.
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        let blood_type = match self.blood_type {
            Some(blood_type) => blood_type.as_str(),
            None => "Unknown",
        };
        let mut summary = format!(
            "Patient: {}\nMRN: {}\nDate of Birth: {}\nBlood Type: {}\nHeight: {:.1} cm\nWeight: {:.1} kg\nActive Medications:",
            self.full_name_and_age(now),
            self.medical_record_number.simple(),
            self.date_of_birth_string(),
            blood_type,
            f64::from(self.height_mm) / 10.0,
            f64::from(self.weight_g) / 1000.0,
        );
        for medication in self.current_medications(now) {
            let _ = write!(
                summary,
                "\n{} ({} days remaining)",
                medication,
                medication.days_remaining(now)
            );
        }
        summary
    }
}

impl PartialEq for Patient {
    fn eq(&self, other: &Self) -> bool {
        self.medical_record_number == other.medical_record_number
    }
}

impl Eq for Patient {}

impl Hash for Patient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.medical_record_number.hash(state);
    }
}

/// Whole calendar years elapsed from `from` to `to`.
fn whole_years_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i32 {
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}
