//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{users, vehicle_details, vehicles};
use crate::domain::{Turbo, VehicleDetail};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub profile_pic: Option<String>,
    pub password_hash: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub display_name: &'a str,
    pub email: &'a str,
    pub profile_pic: Option<&'a str>,
    pub password_hash: &'a str,
}

/// Changeset struct for profile updates.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub display_name: &'a str,
    pub email: &'a str,
    pub profile_pic: Option<&'a str>,
}

/// Row struct for reading from the vehicles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vin: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new vehicle records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vehicles)]
pub(crate) struct NewVehicleRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub vin: &'a str,
}

/// Row struct for reading from the vehicle_details table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicle_details)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VehicleDetailRow {
    #[expect(dead_code, reason = "join key, not part of the domain detail")]
    pub vehicle_id: Uuid,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<String>,
    pub horsepower: Option<String>,
    pub turbo: Option<bool>,
    pub engine_model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission_style: Option<String>,
    pub drive_type: Option<String>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

impl From<VehicleDetailRow> for VehicleDetail {
    fn from(row: VehicleDetailRow) -> Self {
        Self {
            year: row.year,
            make: row.make,
            model: row.model,
            trim: row.trim,
            top_speed: row.top_speed,
            cylinders: row.cylinders,
            horsepower: row.horsepower,
            turbo: Turbo::from_db(row.turbo),
            engine_model: row.engine_model,
            fuel_type: row.fuel_type,
            transmission_style: row.transmission_style,
            drive_type: row.drive_type,
        }
    }
}

/// Insertable struct for creating new detail records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = vehicle_details)]
pub(crate) struct NewVehicleDetailRow<'a> {
    pub vehicle_id: Uuid,
    pub year: Option<i32>,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub trim: Option<&'a str>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<&'a str>,
    pub horsepower: Option<&'a str>,
    pub turbo: Option<bool>,
    pub engine_model: Option<&'a str>,
    pub fuel_type: Option<&'a str>,
    pub transmission_style: Option<&'a str>,
    pub drive_type: Option<&'a str>,
}

impl<'a> NewVehicleDetailRow<'a> {
    pub(crate) fn from_detail(vehicle_id: Uuid, detail: &'a VehicleDetail) -> Self {
        Self {
            vehicle_id,
            year: detail.year,
            make: detail.make.as_deref(),
            model: detail.model.as_deref(),
            trim: detail.trim.as_deref(),
            top_speed: detail.top_speed,
            cylinders: detail.cylinders.as_deref(),
            horsepower: detail.horsepower.as_deref(),
            turbo: detail.turbo.as_db(),
            engine_model: detail.engine_model.as_deref(),
            fuel_type: detail.fuel_type.as_deref(),
            transmission_style: detail.transmission_style.as_deref(),
            drive_type: detail.drive_type.as_deref(),
        }
    }
}

/// Changeset for replacing a detail record with a patched version.
///
/// The patch is applied in memory to the stored detail first, so this
/// writes the full merged record plus a fresh `updated_at`.
/// `treat_none_as_null` keeps cleared fields (such as turbo back to
/// unspecified) representable.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = vehicle_details)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VehicleDetailChangeset<'a> {
    pub year: Option<i32>,
    pub make: Option<&'a str>,
    pub model: Option<&'a str>,
    pub trim: Option<&'a str>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<&'a str>,
    pub horsepower: Option<&'a str>,
    pub turbo: Option<bool>,
    pub engine_model: Option<&'a str>,
    pub fuel_type: Option<&'a str>,
    pub transmission_style: Option<&'a str>,
    pub drive_type: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> VehicleDetailChangeset<'a> {
    pub(crate) fn from_detail(detail: &'a VehicleDetail) -> Self {
        Self {
            year: detail.year,
            make: detail.make.as_deref(),
            model: detail.model.as_deref(),
            trim: detail.trim.as_deref(),
            top_speed: detail.top_speed,
            cylinders: detail.cylinders.as_deref(),
            horsepower: detail.horsepower.as_deref(),
            turbo: detail.turbo.as_db(),
            engine_model: detail.engine_model.as_deref(),
            fuel_type: detail.fuel_type.as_deref(),
            transmission_style: detail.transmission_style.as_deref(),
            drive_type: detail.drive_type.as_deref(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_changeset_stamps_a_fresh_updated_at() {
        let detail = VehicleDetail {
            year: Some(2023),
            make: Some("Toyota".to_owned()),
            ..VehicleDetail::default()
        };
        let before = Utc::now();
        let changeset = VehicleDetailChangeset::from_detail(&detail);

        assert!(changeset.updated_at >= before);
        assert_eq!(changeset.year, Some(2023));
        assert_eq!(changeset.make, Some("Toyota"));
    }
}
