//! Roster wire model: a whole patient store in one YAML document.
//!
//! The store itself guarantees no enumeration order, so rendering sorts
//! patients by medical record number to keep the output deterministic.

use carelog_core::PatientStore;
use serde::{Deserialize, Serialize};

use crate::patient::{domain_to_wire, wire_to_domain, PatientWire};
use crate::{RecordsError, RecordsResult};

/// Roster file operations.
///
/// Zero-sized namespace type; all methods are associated functions.
pub struct Roster;

impl Roster {
    /// Parse a roster from YAML text into a [`PatientStore`].
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError`] if the YAML does not match the roster
    /// schema, `resourceType` is not `"Roster"`, or any contained patient
    /// fails to translate.
    pub fn parse(yaml_text: &str) -> RecordsResult<PatientStore> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, RosterWire>(deserializer) {
            Ok(parsed) => parsed,
            Err(err) => {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() {
                    "<root>"
                } else {
                    path.as_str()
                };
                return Err(RecordsError::Translation(format!(
                    "Roster schema mismatch at {path}: {source}"
                )));
            }
        };

        if wire.resource_type != "Roster" {
            return Err(RecordsError::InvalidInput(format!(
                "Expected resourceType 'Roster', got '{}'",
                wire.resource_type
            )));
        }

        let patients = wire
            .patients
            .into_iter()
            .map(wire_to_domain)
            .collect::<RecordsResult<Vec<_>>>()?;

        Ok(PatientStore::with_patients(patients))
    }

    /// Render a [`PatientStore`] as YAML text, patients sorted by MRN.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError`] if serialisation fails.
    pub fn render(store: &PatientStore) -> RecordsResult<String> {
        let mut patients: Vec<PatientWire> = store.all().map(domain_to_wire).collect();
        patients.sort_by(|a, b| a.medical_record_number.cmp(&b.medical_record_number));

        let wire = RosterWire {
            resource_type: "Roster".to_string(),
            patients,
        };
        Ok(serde_yaml::to_string(&wire)?)
    }
}

/// Wire representation of a roster file.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct RosterWire {
    #[serde(rename = "resourceType")]
    resource_type: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    patients: Vec<PatientWire>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use carelog_core::{
        BloodType, Dosage, DosageUnit, Medication, MedicationRoute, Patient,
    };
    use carelog_types::NonEmptyText;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    fn patient(first: &str, last: &str, blood_type: Option<BloodType>) -> Patient {
        Patient::new(
            NonEmptyText::new(first).expect("valid name"),
            NonEmptyText::new(last).expect("valid name"),
            Utc.with_ymd_and_hms(1985, 11, 30, 0, 0, 0).unwrap(),
            1700,
            72000,
            blood_type,
            fixed_now(),
        )
        .expect("valid patient")
    }

    fn medication(name: &str, prescribed: DateTime<Utc>) -> Medication {
        Medication::new(
            NonEmptyText::new(name).expect("valid name"),
            Dosage::new(81, DosageUnit::Milligrams),
            MedicationRoute::Oral,
            1,
            90,
            prescribed,
        )
    }

    #[test]
    fn round_trips_a_store_and_preserves_current_medications() {
        let now = fixed_now();
        let mut with_history = patient("John", "Doe", Some(BloodType::AbPositive));
        with_history
            .prescribe(medication("Old", now - Duration::days(200)), now)
            .expect("expired course");
        with_history
            .prescribe(medication("Aspirin", now - Duration::days(10)), now)
            .expect("active course");
        with_history
            .prescribe(medication("Metoprolol", now - Duration::days(3)), now)
            .expect("active course");
        let mrn = with_history.medical_record_number();

        let expected: Vec<String> = with_history
            .current_medications(now)
            .iter()
            .map(|m| m.id().simple().to_string())
            .collect();
        assert_eq!(expected.len(), 2);

        let mut store = PatientStore::new();
        store.add(with_history);
        store.add(patient("Jane", "Smith", None));

        let yaml = Roster::render(&store).expect("render roster");
        let reloaded = Roster::parse(&yaml).expect("parse roster");
        assert_eq!(reloaded.len(), 2);

        let restored = reloaded.get(mrn).expect("patient survives round trip");
        let actual: Vec<String> = restored
            .current_medications(now)
            .iter()
            .map(|m| m.id().simple().to_string())
            .collect();
        assert_eq!(actual, expected);
        assert_eq!(restored.medications().len(), 3);
    }

    #[test]
    fn renders_patients_sorted_by_record_number() {
        let mut store = PatientStore::new();
        for i in 0..4 {
            store.add(patient(&format!("P{i}"), "Test", None));
        }

        let yaml = Roster::render(&store).expect("render roster");
        let second = Roster::render(&Roster::parse(&yaml).expect("parse roster"))
            .expect("render reloaded roster");
        assert_eq!(yaml, second);
    }

    #[test]
    fn an_empty_store_round_trips() {
        let yaml = Roster::render(&PatientStore::new()).expect("render empty roster");
        let reloaded = Roster::parse(&yaml).expect("parse empty roster");
        assert!(reloaded.is_empty());
    }

    #[test]
    fn rejects_a_wrong_resource_type() {
        let err = Roster::parse("resourceType: Patient\n").expect_err("should reject");
        match err {
            RecordsError::InvalidInput(msg) => {
                assert!(msg.contains("Roster"));
            }
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_bad_patient_entry_with_a_path() {
        let input = r#"resourceType: Roster
patients:
  - resourceType: Patient
    medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
    firstName: John
    lastName: Doe
    dateOfBirth: 2000-01-18T09:11:31Z
    heightMm: 1800
    weightG: 70000
    extra: nope
"#;

        let err = Roster::parse(input).expect_err("should reject unknown key");
        match err {
            RecordsError::Translation(msg) => {
                assert!(msg.contains("extra"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }
}
