//! ABO/Rh blood types and the donor compatibility table.
//!
//! The compatibility table is static clinical data, not something derived
//! from ABO/Rh logic at runtime: each recipient type maps to the fixed set
//! of donor types it can safely receive from.

use std::fmt;
use std::str::FromStr;

/// Error returned when parsing a string that is not one of the eight
/// ABO/Rh blood type notations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood type: {0}")]
pub struct UnknownBloodType(pub String);

/// One of the eight ABO/Rh blood types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    OPositive,
    ONegative,
    AbPositive,
    AbNegative,
}

impl BloodType {
    /// All eight blood types.
    pub const ALL: [BloodType; 8] = [
        BloodType::APositive,
        BloodType::ANegative,
        BloodType::BPositive,
        BloodType::BNegative,
        BloodType::OPositive,
        BloodType::ONegative,
        BloodType::AbPositive,
        BloodType::AbNegative,
    ];

    /// The clinical notation for this blood type (e.g. `"AB+"`).
    pub fn as_str(self) -> &'static str {
        match self {
            BloodType::APositive => "A+",
            BloodType::ANegative => "A-",
            BloodType::BPositive => "B+",
            BloodType::BNegative => "B-",
            BloodType::OPositive => "O+",
            BloodType::ONegative => "O-",
            BloodType::AbPositive => "AB+",
            BloodType::AbNegative => "AB-",
        }
    }

    /// The donor blood types a recipient of this type can safely receive
    /// from.
    ///
    /// Every type is compatible with itself. `AB+` is the universal
    /// recipient; `O-` can only receive from `O-`.
    pub fn compatible_donors(self) -> &'static [BloodType] {
        match self {
            BloodType::AbPositive => &Self::ALL,
            BloodType::AbNegative => &[
                BloodType::AbNegative,
                BloodType::ANegative,
                BloodType::BNegative,
                BloodType::ONegative,
            ],
            BloodType::APositive => &[
                BloodType::APositive,
                BloodType::ANegative,
                BloodType::OPositive,
                BloodType::ONegative,
            ],
            BloodType::ANegative => &[BloodType::ANegative, BloodType::ONegative],
            BloodType::BPositive => &[
                BloodType::BPositive,
                BloodType::BNegative,
                BloodType::OPositive,
                BloodType::ONegative,
            ],
            BloodType::BNegative => &[BloodType::BNegative, BloodType::ONegative],
            BloodType::OPositive => &[BloodType::OPositive, BloodType::ONegative],
            BloodType::ONegative => &[BloodType::ONegative],
        }
    }

    /// Whether a recipient of this type can receive from the given donor
    /// type.
    pub fn can_receive_from(self, donor: BloodType) -> bool {
        self.compatible_donors().contains(&donor)
    }
}

impl fmt::Display for BloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodType {
    type Err = UnknownBloodType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A+" => Ok(BloodType::APositive),
            "A-" => Ok(BloodType::ANegative),
            "B+" => Ok(BloodType::BPositive),
            "B-" => Ok(BloodType::BNegative),
            "O+" => Ok(BloodType::OPositive),
            "O-" => Ok(BloodType::ONegative),
            "AB+" => Ok(BloodType::AbPositive),
            "AB-" => Ok(BloodType::AbNegative),
            other => Err(UnknownBloodType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_is_compatible_with_itself() {
        for blood_type in BloodType::ALL {
            assert!(
                blood_type.compatible_donors().contains(&blood_type),
                "{blood_type} is not self-compatible"
            );
        }
    }

    #[test]
    fn ab_positive_is_the_universal_recipient() {
        assert_eq!(BloodType::AbPositive.compatible_donors().len(), 8);
    }

    #[test]
    fn o_negative_receives_only_from_itself() {
        assert_eq!(
            BloodType::ONegative.compatible_donors(),
            &[BloodType::ONegative]
        );
    }

    #[test]
    fn rh_negative_recipients_never_receive_rh_positive_blood() {
        for recipient in [
            BloodType::ANegative,
            BloodType::BNegative,
            BloodType::ONegative,
            BloodType::AbNegative,
        ] {
            for donor in [
                BloodType::APositive,
                BloodType::BPositive,
                BloodType::OPositive,
                BloodType::AbPositive,
            ] {
                assert!(
                    !recipient.can_receive_from(donor),
                    "{recipient} must not receive from {donor}"
                );
            }
        }
    }

    #[test]
    fn a_positive_row_matches_the_table() {
        assert_eq!(
            BloodType::APositive.compatible_donors(),
            &[
                BloodType::APositive,
                BloodType::ANegative,
                BloodType::OPositive,
                BloodType::ONegative,
            ]
        );
    }

    #[test]
    fn notation_round_trips_through_parse() {
        for blood_type in BloodType::ALL {
            let parsed: BloodType = blood_type.as_str().parse().expect("valid notation");
            assert_eq!(parsed, blood_type);
        }
    }

    #[test]
    fn parse_rejects_unknown_notation() {
        let err = "C+".parse::<BloodType>().expect_err("expected rejection");
        assert_eq!(err, UnknownBloodType("C+".to_string()));
    }
}
