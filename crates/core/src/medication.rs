//! Medication prescriptions and their derived state.
//!
//! A [`Medication`] is created once at prescription time and never mutated;
//! "removing" one means deleting it from the owning patient's history. The
//! active/expired state and the days remaining are derived from the stored
//! fields and an explicit `now`, so callers (and tests) control the clock.

use std::fmt;
use std::str::FromStr;

use carelog_types::NonEmptyText;
use chrono::{DateTime, Days, Utc};
use uuid::Uuid;

/// Error returned when parsing a string that is not a dosage unit token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dosage unit: {0}")]
pub struct UnknownDosageUnit(pub String);

/// Error returned when parsing a string that is not a medication route
/// token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown medication route: {0}")]
pub struct UnknownRoute(pub String);

/// Units of measurement for medication dosages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DosageUnit {
    Grams,
    Milligrams,
    Micrograms,
}

impl DosageUnit {
    /// The unit symbol (`"g"`, `"mg"`, `"mcg"`).
    pub fn as_str(self) -> &'static str {
        match self {
            DosageUnit::Grams => "g",
            DosageUnit::Milligrams => "mg",
            DosageUnit::Micrograms => "mcg",
        }
    }
}

impl fmt::Display for DosageUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DosageUnit {
    type Err = UnknownDosageUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" => Ok(DosageUnit::Grams),
            "mg" => Ok(DosageUnit::Milligrams),
            "mcg" => Ok(DosageUnit::Micrograms),
            other => Err(UnknownDosageUnit(other.to_string())),
        }
    }
}

/// A medication dosage: a positive amount and its unit.
///
/// Equality is by value. Displays without a separating space (`"81mg"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dosage {
    /// The numeric amount of the dosage.
    pub value: u32,
    /// The unit of measurement.
    pub unit: DosageUnit,
}

impl Dosage {
    pub fn new(value: u32, unit: DosageUnit) -> Self {
        Self { value, unit }
    }
}

impl fmt::Display for Dosage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Route of administration for a medication.
///
/// [`MedicationRoute::as_str`] is the stable token used on the wire and in
/// CLI input; [`MedicationRoute::phrase`] is the clinical phrase used in
/// prescription descriptions ("Aspirin 81mg **by mouth** once daily ...").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MedicationRoute {
    Oral,
    Subcutaneous,
    Intramuscular,
    Intravenous,
    Inhaled,
    Topical,
}

impl MedicationRoute {
    /// The stable route token (`"oral"`, `"subcutaneous"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            MedicationRoute::Oral => "oral",
            MedicationRoute::Subcutaneous => "subcutaneous",
            MedicationRoute::Intramuscular => "intramuscular",
            MedicationRoute::Intravenous => "intravenous",
            MedicationRoute::Inhaled => "inhaled",
            MedicationRoute::Topical => "topical",
        }
    }

    /// The phrase used when describing a prescription.
    pub fn phrase(self) -> &'static str {
        match self {
            MedicationRoute::Oral => "by mouth",
            MedicationRoute::Subcutaneous => "subcutaneously",
            MedicationRoute::Intramuscular => "intramuscularly",
            MedicationRoute::Intravenous => "intravenously",
            MedicationRoute::Inhaled => "inhaled",
            MedicationRoute::Topical => "topically",
        }
    }
}

impl fmt::Display for MedicationRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

impl FromStr for MedicationRoute {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "oral" => Ok(MedicationRoute::Oral),
            "subcutaneous" => Ok(MedicationRoute::Subcutaneous),
            "intramuscular" => Ok(MedicationRoute::Intramuscular),
            "intravenous" => Ok(MedicationRoute::Intravenous),
            "inhaled" => Ok(MedicationRoute::Inhaled),
            "topical" => Ok(MedicationRoute::Topical),
            other => Err(UnknownRoute(other.to_string())),
        }
    }
}

/// A medication prescribed to a patient.
///
/// Immutable after creation; the identifier is generated when the
/// prescription is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Medication {
    id: Uuid,
    name: NonEmptyText,
    dosage: Dosage,
    route: MedicationRoute,
    frequency_per_day: u32,
    duration_days: u32,
    date_prescribed: DateTime<Utc>,
}

impl Medication {
    /// Creates a new prescription with a freshly generated identifier.
    ///
    /// Dosage, frequency, and duration values are trusted as given; the
    /// core applies no business validation beyond the non-empty name the
    /// type already guarantees.
    pub fn new(
        name: NonEmptyText,
        dosage: Dosage,
        route: MedicationRoute,
        frequency_per_day: u32,
        duration_days: u32,
        date_prescribed: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            dosage,
            route,
            frequency_per_day,
            duration_days,
            date_prescribed,
        }
    }

    /// Reconstructs a medication with a known identifier.
    ///
    /// Intended for the wire layer, which must round-trip the identifier
    /// generated at prescription time.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: Uuid,
        name: NonEmptyText,
        dosage: Dosage,
        route: MedicationRoute,
        frequency_per_day: u32,
        duration_days: u32,
        date_prescribed: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            dosage,
            route,
            frequency_per_day,
            duration_days,
            date_prescribed,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn dosage(&self) -> Dosage {
        self.dosage
    }

    pub fn route(&self) -> MedicationRoute {
        self.route
    }

    pub fn frequency_per_day(&self) -> u32 {
        self.frequency_per_day
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn date_prescribed(&self) -> DateTime<Utc> {
        self.date_prescribed
    }

    /// The date the prescribed course ends, using calendar-day addition.
    ///
    /// Returns `None` if the date arithmetic overflows, in which case the
    /// medication is treated as inactive.
    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.date_prescribed
            .checked_add_days(Days::new(u64::from(self.duration_days)))
    }

    /// Whether the prescribed course is still running at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.end_date() {
            Some(end) => now < end,
            None => false,
        }
    }

    /// Whole days left in the course at `now`; 0 once the course has ended.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        if !self.is_active(now) {
            return 0;
        }
        match self.end_date() {
            Some(end) => (end - now).num_days(),
            None => 0,
        }
    }

    fn frequency_phrase(&self) -> String {
        match self.frequency_per_day {
            1 => "once daily".to_string(),
            2 => "twice daily".to_string(),
            n => format!("{n} times daily"),
        }
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} for {} days",
            self.name,
            self.dosage,
            self.route.phrase(),
            self.frequency_phrase(),
            self.duration_days
        )
    }
}
