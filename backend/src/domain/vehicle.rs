//! Vehicle data model: VIN, decoded detail record, and partial updates.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::user::UserId;

/// Validation errors returned by [`Vin::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VinValidationError {
    /// VIN was missing or blank once trimmed.
    Empty,
    /// VIN was not exactly 17 characters.
    BadLength { found: usize },
    /// VIN contained a character outside the VIN alphabet (ASCII letters
    /// and digits, excluding I, O, and Q).
    InvalidCharacter { character: char },
}

impl fmt::Display for VinValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "VIN must not be empty"),
            Self::BadLength { found } => {
                write!(f, "VIN must be exactly 17 characters, got {found}")
            }
            Self::InvalidCharacter { character } => {
                write!(f, "VIN must not contain {character:?}")
            }
        }
    }
}

impl std::error::Error for VinValidationError {}

/// A 17-character Vehicle Identification Number, uppercased on construction.
///
/// ## Invariants
/// - exactly 17 ASCII alphanumeric characters
/// - the letters I, O, and Q never appear
/// - never mutated after creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Vin(String);

impl Vin {
    /// Validate and construct a [`Vin`], trimming and uppercasing the input.
    pub fn new(vin: impl Into<String>) -> Result<Self, VinValidationError> {
        let normalised = vin.into().trim().to_ascii_uppercase();
        if normalised.is_empty() {
            return Err(VinValidationError::Empty);
        }
        let length = normalised.chars().count();
        if length != 17 {
            return Err(VinValidationError::BadLength { found: length });
        }
        for character in normalised.chars() {
            let allowed = character.is_ascii_alphanumeric()
                && !matches!(character, 'I' | 'O' | 'Q');
            if !allowed {
                return Err(VinValidationError::InvalidCharacter { character });
            }
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for Vin {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Vin> for String {
    fn from(value: Vin) -> Self {
        value.0
    }
}

impl TryFrom<String> for Vin {
    type Error = VinValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stable vehicle identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(Uuid);

impl VehicleId {
    /// Generate a new random [`VehicleId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vehicle owned by a user, keyed in practice by `(vin, owner)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[schema(value_type = String)]
    id: VehicleId,
    #[schema(value_type = String)]
    owner: UserId,
    #[schema(value_type = String, example = "2T3W1RFV3PW284566")]
    vin: Vin,
}

impl Vehicle {
    /// Build a vehicle from validated components.
    #[must_use]
    pub fn new(id: VehicleId, owner: UserId, vin: Vin) -> Self {
        Self { id, owner, vin }
    }

    /// Stable vehicle identifier.
    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Immutable VIN.
    pub fn vin(&self) -> &Vin {
        &self.vin
    }
}

/// Three-valued turbo flag: the decoder may say yes, no, or nothing at all.
///
/// Stored as a nullable boolean; `Unspecified` maps to SQL `NULL`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Turbo {
    Yes,
    No,
    #[default]
    Unspecified,
}

impl Turbo {
    /// Parse a decoder-supplied value. Anything other than a clear yes/no
    /// counts as unspecified.
    #[must_use]
    pub fn from_decoder_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("yes") => Self::Yes,
            Some(v) if v.eq_ignore_ascii_case("no") => Self::No,
            _ => Self::Unspecified,
        }
    }

    /// Convert to the nullable boolean the storage layer affords.
    #[must_use]
    pub fn as_db(self) -> Option<bool> {
        match self {
            Self::Yes => Some(true),
            Self::No => Some(false),
            Self::Unspecified => None,
        }
    }

    /// Reconstruct from a stored nullable boolean.
    #[must_use]
    pub fn from_db(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::Yes,
            Some(false) => Self::No,
            None => Self::Unspecified,
        }
    }
}

/// Normalised decoded attributes for one vehicle.
///
/// Every field is optional: the decoder omitting a variable is a normal,
/// non-error outcome, so absence is representable everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetail {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<String>,
    pub horsepower: Option<String>,
    #[serde(default)]
    pub turbo: Turbo,
    pub engine_model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission_style: Option<String>,
    pub drive_type: Option<String>,
}

/// Partial update for a [`VehicleDetail`].
///
/// Only present fields overwrite the stored value; everything else keeps
/// its prior value. Handlers translate empty form fields to `None` before
/// building a patch, so "submitted and non-empty" is the only way a field
/// ends up here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleDetailPatch {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<String>,
    pub horsepower: Option<String>,
    pub turbo: Option<Turbo>,
    pub engine_model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission_style: Option<String>,
    pub drive_type: Option<String>,
}

impl VehicleDetailPatch {
    /// True when no field was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a stored detail record, field by field.
    #[must_use]
    pub fn apply(&self, mut detail: VehicleDetail) -> VehicleDetail {
        if let Some(year) = self.year {
            detail.year = Some(year);
        }
        if let Some(make) = &self.make {
            detail.make = Some(make.clone());
        }
        if let Some(model) = &self.model {
            detail.model = Some(model.clone());
        }
        if let Some(trim) = &self.trim {
            detail.trim = Some(trim.clone());
        }
        if let Some(top_speed) = self.top_speed {
            detail.top_speed = Some(top_speed);
        }
        if let Some(cylinders) = &self.cylinders {
            detail.cylinders = Some(cylinders.clone());
        }
        if let Some(horsepower) = &self.horsepower {
            detail.horsepower = Some(horsepower.clone());
        }
        if let Some(turbo) = self.turbo {
            detail.turbo = turbo;
        }
        if let Some(engine_model) = &self.engine_model {
            detail.engine_model = Some(engine_model.clone());
        }
        if let Some(fuel_type) = &self.fuel_type {
            detail.fuel_type = Some(fuel_type.clone());
        }
        if let Some(transmission_style) = &self.transmission_style {
            detail.transmission_style = Some(transmission_style.clone());
        }
        if let Some(drive_type) = &self.drive_type {
            detail.drive_type = Some(drive_type.clone());
        }
        detail
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2t3w1rfv3pw284566", "2T3W1RFV3PW284566")]
    #[case("  1HGCM82633A123456  ", "1HGCM82633A123456")]
    fn vin_uppercases_and_trims(#[case] input: &str, #[case] expected: &str) {
        let vin = Vin::new(input).expect("valid VIN");
        assert_eq!(vin.as_ref(), expected);
    }

    #[rstest]
    #[case("", VinValidationError::Empty)]
    #[case("TOOSHORT", VinValidationError::BadLength { found: 8 })]
    #[case("2T3W1RFV3PW2845660", VinValidationError::BadLength { found: 18 })]
    #[case("2T3W1RFV3PW28456I", VinValidationError::InvalidCharacter { character: 'I' })]
    #[case("2T3W1RFV3PW28456-", VinValidationError::InvalidCharacter { character: '-' })]
    fn vin_rejects_invalid(#[case] input: &str, #[case] expected: VinValidationError) {
        assert_eq!(Vin::new(input).expect_err("must fail"), expected);
    }

    #[rstest]
    #[case(Some("Yes"), Turbo::Yes)]
    #[case(Some("no"), Turbo::No)]
    #[case(Some(" NO "), Turbo::No)]
    #[case(Some("maybe"), Turbo::Unspecified)]
    #[case(None, Turbo::Unspecified)]
    fn turbo_parses_decoder_values(#[case] input: Option<&str>, #[case] expected: Turbo) {
        assert_eq!(Turbo::from_decoder_value(input), expected);
    }

    #[rstest]
    #[case(Turbo::Yes, Some(true))]
    #[case(Turbo::No, Some(false))]
    #[case(Turbo::Unspecified, None)]
    fn turbo_round_trips_through_db(#[case] turbo: Turbo, #[case] db: Option<bool>) {
        assert_eq!(turbo.as_db(), db);
        assert_eq!(Turbo::from_db(db), turbo);
    }

    fn stored_detail() -> VehicleDetail {
        VehicleDetail {
            year: Some(2020),
            make: Some("Toyota".to_owned()),
            model: Some("Corolla".to_owned()),
            trim: Some("LE".to_owned()),
            top_speed: Some(120),
            cylinders: Some("4".to_owned()),
            horsepower: Some("130".to_owned()),
            turbo: Turbo::No,
            engine_model: Some("1.8L".to_owned()),
            fuel_type: Some("Gasoline".to_owned()),
            transmission_style: Some("Automatic".to_owned()),
            drive_type: Some("FWD".to_owned()),
        }
    }

    #[test]
    fn patch_with_only_year_changes_only_year() {
        let patch = VehicleDetailPatch {
            year: Some(2021),
            ..VehicleDetailPatch::default()
        };
        let before = stored_detail();
        let after = patch.apply(before.clone());
        assert_eq!(after.year, Some(2021));
        assert_eq!(
            VehicleDetail {
                year: before.year,
                ..after
            },
            before
        );
    }

    #[test]
    fn empty_patch_is_identity() {
        let patch = VehicleDetailPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(stored_detail()), stored_detail());
    }

    #[test]
    fn patch_can_clear_turbo_to_unspecified() {
        let patch = VehicleDetailPatch {
            turbo: Some(Turbo::Unspecified),
            ..VehicleDetailPatch::default()
        };
        let after = patch.apply(stored_detail());
        assert_eq!(after.turbo, Turbo::Unspecified);
    }
}
