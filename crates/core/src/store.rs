//! In-memory patient store.

use std::collections::HashMap;

use uuid::Uuid;

use crate::Patient;

/// The in-memory collection of patient records, keyed by medical record
/// number.
///
/// Adding a patient whose MRN is already present replaces the existing
/// record (set semantics, not an error). Enumeration order is unspecified;
/// searching and sorting are the caller's concern. The store is
/// single-owner: if it is ever shared across threads, wrap it in one mutex
/// per store so check-then-act sequences like the duplicate-prescription
/// guard stay atomic.
#[derive(Debug, Default, Clone)]
pub struct PatientStore {
    patients: HashMap<Uuid, Patient>,
}

impl PatientStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given patients.
    ///
    /// Later entries with a duplicate MRN replace earlier ones.
    pub fn with_patients(patients: Vec<Patient>) -> Self {
        let mut store = Self::new();
        for patient in patients {
            store.add(patient);
        }
        store
    }

    /// Inserts a patient, replacing any existing record with the same MRN.
    pub fn add(&mut self, patient: Patient) {
        let mrn = patient.medical_record_number();
        if self.patients.insert(mrn, patient).is_some() {
            tracing::debug!("replaced existing record for MRN {}", mrn.simple());
        }
    }

    /// Removes the patient with the given MRN, returning the record if it
    /// was present. A no-op when absent.
    pub fn remove(&mut self, mrn: Uuid) -> Option<Patient> {
        self.patients.remove(&mrn)
    }

    /// Looks up a patient by MRN.
    pub fn get(&self, mrn: Uuid) -> Option<&Patient> {
        self.patients.get(&mrn)
    }

    /// Looks up a patient by MRN for in-place mutation.
    pub fn get_mut(&mut self, mrn: Uuid) -> Option<&mut Patient> {
        self.patients.get_mut(&mrn)
    }

    /// Iterates over all patients in unspecified order.
    pub fn all(&self) -> impl Iterator<Item = &Patient> {
        self.patients.values()
    }

    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
