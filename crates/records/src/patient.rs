//! Patient resource wire models and translation helpers.
//!
//! Responsibilities:
//! - Define a strict wire model for serialisation/deserialisation
//! - Provide translation helpers between `carelog-core` domain types and
//!   the wire model
//! - Validate record structure and enforce required fields
//!
//! Notes:
//! - Dates travel as RFC 3339 strings.
//! - Identifiers travel in canonical 32-hex simple form.
//! - `bloodType` is omitted when unknown; an absent key deserialises to
//!   "unknown", never to a sentinel value.

use carelog_core::{BloodType, Dosage, DosageUnit, Medication, MedicationRoute, Patient};
use carelog_types::NonEmptyText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{RecordsError, RecordsResult};

// ============================================================================
// Public facade
// ============================================================================

/// Patient resource operations.
///
/// This is a zero-sized type used for namespacing; all methods are
/// associated functions.
pub struct PatientResource;

impl PatientResource {
    /// Parse a patient resource from YAML text.
    ///
    /// Uses `serde_path_to_error` to surface a best-effort "path" (e.g.
    /// `medications.0.dosage.unit`) to the failing field when the YAML does
    /// not match the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError`] if:
    /// - the YAML does not represent a valid patient resource,
    /// - any field has an unexpected type or any unknown keys are present,
    /// - `resourceType` is not `"Patient"`,
    /// - any identifier, date, blood type, unit, or route fails to
    ///   translate to its domain type.
    pub fn parse(yaml_text: &str) -> RecordsResult<Patient> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);

        let wire = match serde_path_to_error::deserialize::<_, PatientWire>(deserializer) {
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
                    "Patient schema mismatch at {path}: {source}"
                )));
            }
        };

        wire_to_domain(wire)
    }

    /// Render a patient resource as YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordsError`] if serialisation fails.
    pub fn render(patient: &Patient) -> RecordsResult<String> {
        let wire = domain_to_wire(patient);
        serde_yaml::to_string(&wire)
            .map_err(|e| RecordsError::Translation(format!("Failed to serialise patient: {e}")))
    }
}

// ============================================================================
// Wire types (crate-internal, shared with the roster module)
// ============================================================================

/// Wire representation of a patient record for on-disk YAML.
///
/// This is the exact structure that will be serialised to/from YAML.
/// `#[serde(deny_unknown_fields)]` enforces strict validation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct PatientWire {
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    #[serde(rename = "medicalRecordNumber")]
    pub medical_record_number: String,

    #[serde(rename = "firstName")]
    pub first_name: String,

    #[serde(rename = "lastName")]
    pub last_name: String,

    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: String,

    #[serde(rename = "heightMm")]
    pub height_mm: u32,

    #[serde(rename = "weightG")]
    pub weight_g: u32,

    #[serde(rename = "bloodType", skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<MedicationWire>,
}

/// Wire representation of one prescription in a patient's history.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct MedicationWire {
    pub id: String,

    pub name: String,

    pub dosage: DosageWire,

    pub route: String,

    #[serde(rename = "frequencyPerDay")]
    pub frequency_per_day: u32,

    #[serde(rename = "durationDays")]
    pub duration_days: u32,

    #[serde(rename = "datePrescribed")]
    pub date_prescribed: String,
}

/// Wire representation of a dosage.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct DosageWire {
    pub value: u32,
    pub unit: String,
}

// ============================================================================
// Translation helpers (crate-internal)
// ============================================================================

fn parse_identifier(field: &str, value: &str) -> RecordsResult<Uuid> {
    Uuid::try_parse(value).map_err(|e| RecordsError::InvalidUuid(format!("{field}: {e}")))
}

fn parse_timestamp(field: &str, value: &str) -> RecordsResult<DateTime<Utc>> {
    value
        .parse::<DateTime<Utc>>()
        .map_err(|e| RecordsError::Translation(format!("invalid {field}: {e}")))
}

fn parse_name(field: &str, value: &str) -> RecordsResult<NonEmptyText> {
    NonEmptyText::new(value)
        .map_err(|e| RecordsError::Translation(format!("invalid {field}: {e}")))
}

/// Convert wire format to a domain patient.
pub(crate) fn wire_to_domain(wire: PatientWire) -> RecordsResult<Patient> {
    if wire.resource_type != "Patient" {
        return Err(RecordsError::InvalidInput(format!(
            "Expected resourceType 'Patient', got '{}'",
            wire.resource_type
        )));
    }

    let medical_record_number =
        parse_identifier("medicalRecordNumber", &wire.medical_record_number)?;
    let first_name = parse_name("firstName", &wire.first_name)?;
    let last_name = parse_name("lastName", &wire.last_name)?;
    let date_of_birth = parse_timestamp("dateOfBirth", &wire.date_of_birth)?;

    let blood_type = wire
        .blood_type
        .as_deref()
        .map(|s| {
            s.parse::<BloodType>()
                .map_err(|e| RecordsError::Translation(e.to_string()))
        })
        .transpose()?;

    let medications = wire
        .medications
        .into_iter()
        .map(medication_wire_to_domain)
        .collect::<RecordsResult<Vec<_>>>()?;

    Ok(Patient::from_parts(
        medical_record_number,
        first_name,
        last_name,
        date_of_birth,
        wire.height_mm,
        wire.weight_g,
        blood_type,
        medications,
    ))
}

fn medication_wire_to_domain(wire: MedicationWire) -> RecordsResult<Medication> {
    let id = parse_identifier("medication id", &wire.id)?;
    let name = parse_name("medication name", &wire.name)?;
    let unit = wire
        .dosage
        .unit
        .parse::<DosageUnit>()
        .map_err(|e| RecordsError::Translation(e.to_string()))?;
    let route = wire
        .route
        .parse::<MedicationRoute>()
        .map_err(|e| RecordsError::Translation(e.to_string()))?;
    let date_prescribed = parse_timestamp("datePrescribed", &wire.date_prescribed)?;

    Ok(Medication::from_parts(
        id,
        name,
        Dosage::new(wire.dosage.value, unit),
        route,
        wire.frequency_per_day,
        wire.duration_days,
        date_prescribed,
    ))
}

/// Convert a domain patient to wire format.
pub(crate) fn domain_to_wire(patient: &Patient) -> PatientWire {
    PatientWire {
        resource_type: "Patient".to_string(),
        medical_record_number: patient.medical_record_number().simple().to_string(),
        first_name: patient.first_name.as_str().to_string(),
        last_name: patient.last_name.as_str().to_string(),
        date_of_birth: patient.date_of_birth.to_rfc3339(),
        height_mm: patient.height_mm,
        weight_g: patient.weight_g,
        blood_type: patient.blood_type.map(|bt| bt.as_str().to_string()),
        medications: patient
            .medications()
            .iter()
            .map(medication_domain_to_wire)
            .collect(),
    }
}

fn medication_domain_to_wire(medication: &Medication) -> MedicationWire {
    MedicationWire {
        id: medication.id().simple().to_string(),
        name: medication.name().as_str().to_string(),
        dosage: DosageWire {
            value: medication.dosage().value,
            unit: medication.dosage().unit.as_str().to_string(),
        },
        route: medication.route().as_str().to_string(),
        frequency_per_day: medication.frequency_per_day(),
        duration_days: medication.duration_days(),
        date_prescribed: medication.date_prescribed().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn round_trips_sample_yaml() {
        let input = r#"resourceType: Patient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
bloodType: AB+
medications:
  - id: 7b1c0a4f2d3e4cbfa95d7a6c1e2f3a4b
    name: Aspirin
    dosage:
      value: 81
      unit: mg
    route: oral
    frequencyPerDay: 1
    durationDays: 90
    datePrescribed: 2026-08-01T08:00:00Z
"#;

        let patient = PatientResource::parse(input).expect("parse yaml");
        let output = PatientResource::render(&patient).expect("render patient");
        let reparsed = PatientResource::parse(&output).expect("reparse yaml");

        // Patient equality keys on the MRN alone, so compare the full wire
        // forms to cover every field, medications included.
        assert_eq!(domain_to_wire(&patient), domain_to_wire(&reparsed));
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = r#"resourceType: Patient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
unexpected_key: should_fail
"#;

        let err = PatientResource::parse(input).expect_err("should reject unknown key");
        match err {
            RecordsError::Translation(msg) => {
                assert!(msg.contains("unexpected_key"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn strict_validation_rejects_wrong_types() {
        let input = r#"resourceType: Patient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: "not_a_number"
weightG: 70000
"#;

        let err = PatientResource::parse(input).expect_err("should reject wrong type");
        match err {
            RecordsError::Translation(msg) => {
                assert!(msg.contains("heightMm"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_resource_type() {
        let input = r#"resourceType: NotPatient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
"#;

        let err = PatientResource::parse(input).expect_err("should reject resourceType");
        match err {
            RecordsError::InvalidInput(msg) => {
                assert!(msg.contains("Patient"));
                assert!(msg.contains("NotPatient"));
            }
            other => panic!("expected InvalidInput error, got {other:?}"),
        }
    }

    #[test]
    fn absent_blood_type_parses_to_unknown_and_is_omitted_on_render() {
        let input = r#"resourceType: Patient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
"#;

        let patient = PatientResource::parse(input).expect("parse minimal patient");
        assert!(patient.blood_type.is_none());
        assert!(patient.medications().is_empty());

        let yaml = PatientResource::render(&patient).expect("render patient");
        assert!(!yaml.contains("bloodType"));
        assert!(!yaml.contains("medications"));

        let reparsed = PatientResource::parse(&yaml).expect("reparse yaml");
        assert!(reparsed.blood_type.is_none());
    }

    #[test]
    fn rejects_an_unknown_blood_type_notation() {
        let input = r#"resourceType: Patient
medicalRecordNumber: 90a8d1ea318041d9adb070a834d4e0f6
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
bloodType: C+
"#;

        let err = PatientResource::parse(input).expect_err("should reject blood type");
        match err {
            RecordsError::Translation(msg) => {
                assert!(msg.contains("C+"));
            }
            other => panic!("expected Translation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_a_malformed_record_number() {
        let input = r#"resourceType: Patient
medicalRecordNumber: not-a-uuid
firstName: John
lastName: Doe
dateOfBirth: 2000-01-18T09:11:31Z
heightMm: 1800
weightG: 70000
"#;

        let err = PatientResource::parse(input).expect_err("should reject identifier");
        match err {
            RecordsError::InvalidUuid(msg) => {
                assert!(msg.contains("medicalRecordNumber"));
            }
            other => panic!("expected InvalidUuid error, got {other:?}"),
        }
    }

    #[test]
    fn renders_with_all_fields() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let mut patient = Patient::new(
            NonEmptyText::new("John").expect("valid name"),
            NonEmptyText::new("Doe").expect("valid name"),
            Utc.with_ymd_and_hms(2000, 1, 18, 9, 11, 31).unwrap(),
            1800,
            70000,
            Some(BloodType::AbPositive),
            now,
        )
        .expect("valid patient");
        patient
            .prescribe(
                Medication::new(
                    NonEmptyText::new("Aspirin").expect("valid name"),
                    Dosage::new(81, DosageUnit::Milligrams),
                    MedicationRoute::Oral,
                    1,
                    90,
                    now,
                ),
                now,
            )
            .expect("prescription");

        let yaml = PatientResource::render(&patient).expect("render patient");
        assert!(yaml.contains("resourceType: Patient"));
        assert!(yaml.contains("firstName: John"));
        assert!(yaml.contains("lastName: Doe"));
        assert!(yaml.contains("heightMm: 1800"));
        assert!(yaml.contains("weightG: 70000"));
        assert!(yaml.contains("bloodType: AB+"));
        assert!(yaml.contains("name: Aspirin"));
        assert!(yaml.contains("unit: mg"));
        assert!(yaml.contains("route: oral"));
        assert!(yaml.contains("frequencyPerDay: 1"));
        assert!(yaml.contains("durationDays: 90"));
    }
}
