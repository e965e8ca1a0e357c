//! Naming conventions between property-style selectors and column names.
//!
//! Translation is a pure string transform applied while resolving a selector
//! against a row; rows themselves never change shape.

use convert_case::{Boundary, Case, Casing};
use serde::{Deserialize, Serialize};

// Words start at an uppercase letter; digits stay attached to the
// preceding word (`Line1Total` -> `line1_total`).
const SNAKE_BOUNDARIES: [Boundary; 4] = [
    Boundary::Underscore,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

///
/// NamingConvention
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// Selectors name columns directly (case-insensitive).
    #[default]
    ExactMatch,
    /// `VehicleId` → `vehicle_id`
    SnakeCase,
    /// `VehicleId` → `vehicleId`
    CamelCase,
    /// `VehicleId` → `VehicleId`
    PascalCase,
}

impl NamingConvention {
    /// Return true when translation never changes a selector beyond case.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::ExactMatch | Self::PascalCase)
    }

    /// Translate one property-style selector into its column spelling.
    #[must_use]
    pub fn to_column_name(self, property: &str) -> String {
        match self {
            Self::ExactMatch | Self::PascalCase => property.to_string(),
            Self::SnakeCase => property
                .set_boundaries(&SNAKE_BOUNDARIES)
                .to_case(Case::Snake),
            Self::CamelCase => property.to_case(Case::Camel),
        }
    }

    /// Translate one column name back into property style.
    #[must_use]
    pub fn to_property_name(self, column: &str) -> String {
        match self {
            Self::ExactMatch | Self::PascalCase => column.to_string(),
            Self::SnakeCase | Self::CamelCase => column.to_case(Case::Pascal),
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_round_trips_property_names() {
        let naming = NamingConvention::SnakeCase;

        assert_eq!(naming.to_column_name("VehicleId"), "vehicle_id");
        assert_eq!(naming.to_column_name("Id"), "id");
        assert_eq!(naming.to_property_name("vehicle_id"), "VehicleId");
    }

    #[test]
    fn snake_case_keeps_digits_with_their_word() {
        let naming = NamingConvention::SnakeCase;

        assert_eq!(naming.to_column_name("Line1Total"), "line1_total");
        assert_eq!(naming.to_column_name("Address2"), "address2");
        assert_eq!(naming.to_column_name("vehicle_id"), "vehicle_id");
        assert_eq!(naming.to_property_name("line1_total"), "Line1Total");
    }

    #[test]
    fn camel_case_lowers_the_leading_word() {
        let naming = NamingConvention::CamelCase;

        assert_eq!(naming.to_column_name("VehicleId"), "vehicleId");
        assert_eq!(naming.to_property_name("vehicleId"), "VehicleId");
    }

    #[test]
    fn identity_conventions_leave_names_alone() {
        for naming in [NamingConvention::ExactMatch, NamingConvention::PascalCase] {
            assert!(naming.is_identity());
            assert_eq!(naming.to_column_name("VehicleId"), "VehicleId");
        }
    }

    #[test]
    fn conventions_deserialize_from_snake_case_labels() {
        let naming: NamingConvention =
            serde_json::from_str("\"snake_case\"").expect("naming label");
        assert_eq!(naming, NamingConvention::SnakeCase);
    }
}
