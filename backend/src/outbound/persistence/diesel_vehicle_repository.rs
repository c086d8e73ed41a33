//! PostgreSQL-backed `VehicleRepository` implementation using Diesel ORM.
//!
//! Vehicle and detail rows are written and removed inside a single
//! transaction so the pair can never get out of step. The `(vin, user_id)`
//! unique index enforces the one-copy-per-garage rule; violations surface
//! as [`VehicleStoreError::DuplicateVehicle`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{VehicleRepository, VehicleStoreError};
use crate::domain::{UserId, Vehicle, VehicleDetail, VehicleDetailPatch, VehicleId, Vin};

use super::models::{
    NewVehicleDetailRow, NewVehicleRow, VehicleDetailChangeset, VehicleDetailRow, VehicleRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{vehicle_details, vehicles};

/// Diesel-backed implementation of the `VehicleRepository` port.
#[derive(Clone)]
pub struct DieselVehicleRepository {
    pool: DbPool,
}

impl DieselVehicleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> VehicleStoreError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            VehicleStoreError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> VehicleStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            VehicleStoreError::DuplicateVehicle
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            VehicleStoreError::connection("database connection error")
        }
        DieselError::NotFound => VehicleStoreError::query("record not found"),
        _ => VehicleStoreError::query("database error"),
    }
}

/// Convert a database row to a domain vehicle.
fn row_to_vehicle(row: &VehicleRow) -> Result<Vehicle, VehicleStoreError> {
    let vin = Vin::new(row.vin.clone())
        .map_err(|err| VehicleStoreError::query(format!("stored VIN invalid: {err}")))?;
    Ok(Vehicle::new(
        VehicleId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        vin,
    ))
}

#[async_trait]
impl VehicleRepository for DieselVehicleRepository {
    async fn save_decoded(
        &self,
        vin: &Vin,
        owner: &UserId,
        detail: &VehicleDetail,
    ) -> Result<Vehicle, VehicleStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let vehicle_row = NewVehicleRow {
            id: Uuid::new_v4(),
            user_id: *owner.as_uuid(),
            vin: vin.as_ref(),
        };

        // One transaction so a detail write failure cannot strand a
        // detail-less vehicle row.
        let inserted: VehicleRow = conn
            .transaction(|conn| {
                async move {
                    let inserted: VehicleRow = diesel::insert_into(vehicles::table)
                        .values(&vehicle_row)
                        .returning(VehicleRow::as_returning())
                        .get_result(conn)
                        .await?;

                    diesel::insert_into(vehicle_details::table)
                        .values(NewVehicleDetailRow::from_detail(inserted.id, detail))
                        .execute(conn)
                        .await?;

                    Ok::<_, diesel::result::Error>(inserted)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row_to_vehicle(&inserted)
    }

    async fn find_with_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
    ) -> Result<Option<(Vehicle, VehicleDetail)>, VehicleStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(VehicleRow, VehicleDetailRow)> = vehicles::table
            .inner_join(vehicle_details::table)
            .filter(vehicles::vin.eq(vin.as_ref()))
            .filter(vehicles::user_id.eq(owner.as_uuid()))
            .select((VehicleRow::as_select(), VehicleDetailRow::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(vehicle_row, detail_row)| {
            Ok((row_to_vehicle(&vehicle_row)?, VehicleDetail::from(detail_row)))
        })
        .transpose()
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, VehicleStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<VehicleRow> = vehicles::table
            .filter(vehicles::user_id.eq(owner.as_uuid()))
            .order_by(vehicles::vin)
            .select(VehicleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.iter().map(row_to_vehicle).collect()
    }

    async fn update_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
        patch: &VehicleDetailPatch,
    ) -> Result<Option<VehicleDetail>, VehicleStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Read-merge-write in one transaction so concurrent edits never
        // interleave at the field level.
        let updated = conn
            .transaction(|conn| {
                async move {
                    let row: Option<(VehicleRow, VehicleDetailRow)> = vehicles::table
                        .inner_join(vehicle_details::table)
                        .filter(vehicles::vin.eq(vin.as_ref()))
                        .filter(vehicles::user_id.eq(owner.as_uuid()))
                        .select((VehicleRow::as_select(), VehicleDetailRow::as_select()))
                        .first(conn)
                        .await
                        .optional()?;

                    let Some((vehicle_row, detail_row)) = row else {
                        return Ok::<_, diesel::result::Error>(None);
                    };

                    let merged = patch.apply(VehicleDetail::from(detail_row));
                    diesel::update(vehicle_details::table.find(vehicle_row.id))
                        .set(VehicleDetailChangeset::from_detail(&merged))
                        .execute(conn)
                        .await?;

                    Ok(Some(merged))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(updated)
    }

    async fn delete(&self, vin: &Vin, owner: &UserId) -> Result<bool, VehicleStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // The detail row goes via ON DELETE CASCADE; the explicit delete
        // keeps the behaviour independent of that constraint.
        let deleted = conn
            .transaction(|conn| {
                async move {
                    let vehicle_id: Option<Uuid> = vehicles::table
                        .filter(vehicles::vin.eq(vin.as_ref()))
                        .filter(vehicles::user_id.eq(owner.as_uuid()))
                        .select(vehicles::id)
                        .first(conn)
                        .await
                        .optional()?;

                    let Some(vehicle_id) = vehicle_id else {
                        return Ok::<_, diesel::result::Error>(false);
                    };

                    diesel::delete(vehicle_details::table.find(vehicle_id))
                        .execute(conn)
                        .await?;
                    diesel::delete(vehicles::table.find(vehicle_id))
                        .execute(conn)
                        .await?;

                    Ok(true)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted)
    }
}
