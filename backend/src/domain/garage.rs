//! Garage use-cases: VIN lookup, adding, editing, and removing vehicles.
//!
//! Storage is always consulted before the decoder, so the external service
//! is called at most once per distinct `(vin, owner)` pair. Decoder
//! failures surface as retryable "could not retrieve" conditions and never
//! leave partial records behind.

use std::sync::Arc;

use crate::domain::error::Error;
use crate::domain::ports::{
    VehicleRepository, VehicleStoreError, VinDecodeError, VinDecoder,
};
use crate::domain::user::UserId;
use crate::domain::vehicle::{Vehicle, VehicleDetail, VehicleDetailPatch, Vin};

/// Vehicle lookup and garage management service.
#[derive(Clone)]
pub struct GarageService {
    vehicles: Arc<dyn VehicleRepository>,
    decoder: Arc<dyn VinDecoder>,
}

fn map_store_error(error: VehicleStoreError) -> Error {
    match error {
        VehicleStoreError::Connection { message } => Error::service_unavailable(message),
        VehicleStoreError::Query { message } => Error::internal(message),
        VehicleStoreError::DuplicateVehicle => {
            Error::conflict("vehicle is already in your garage")
        }
    }
}

fn map_decode_error(error: VinDecodeError) -> Error {
    tracing::warn!(error = %error, "VIN decode failed");
    match error {
        VinDecodeError::Transport { .. }
        | VinDecodeError::Timeout { .. }
        | VinDecodeError::Status { .. } => {
            Error::service_unavailable("vehicle info could not be retrieved")
        }
        VinDecodeError::Decode { message } => Error::internal(message),
    }
}

impl GarageService {
    /// Create a service over the given repository and decoder.
    pub fn new(vehicles: Arc<dyn VehicleRepository>, decoder: Arc<dyn VinDecoder>) -> Self {
        Self { vehicles, decoder }
    }

    /// Preview the detail record for a VIN: the stored record when the user
    /// already owns this vehicle, otherwise a fresh decode that is *not*
    /// persisted.
    pub async fn lookup(&self, owner: &UserId, vin: &Vin) -> Result<VehicleDetail, Error> {
        if let Some((_, detail)) = self
            .vehicles
            .find_with_detail(vin, owner)
            .await
            .map_err(map_store_error)?
        {
            return Ok(detail);
        }
        self.decoder.decode(vin).await.map_err(map_decode_error)
    }

    /// Decode a VIN and store the vehicle with its detail atomically.
    /// Storage is checked first; an existing vehicle is a conflict and the
    /// decoder is not called for it.
    pub async fn add_vehicle(
        &self,
        owner: &UserId,
        vin: &Vin,
    ) -> Result<(Vehicle, VehicleDetail), Error> {
        if self
            .vehicles
            .find_with_detail(vin, owner)
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            return Err(map_store_error(VehicleStoreError::DuplicateVehicle));
        }

        let detail = self.decoder.decode(vin).await.map_err(map_decode_error)?;
        let vehicle = self
            .vehicles
            .save_decoded(vin, owner, &detail)
            .await
            .map_err(map_store_error)?;
        tracing::info!(vin = %vin, owner = %owner, "vehicle added");
        Ok((vehicle, detail))
    }

    /// Fetch the stored detail for one of the user's vehicles.
    pub async fn detail(&self, owner: &UserId, vin: &Vin) -> Result<VehicleDetail, Error> {
        self.vehicles
            .find_with_detail(vin, owner)
            .await
            .map_err(map_store_error)?
            .map(|(_, detail)| detail)
            .ok_or_else(|| Error::not_found("vehicle not found"))
    }

    /// List the user's vehicles.
    pub async fn list(&self, owner: &UserId) -> Result<Vec<Vehicle>, Error> {
        self.vehicles
            .list_for_owner(owner)
            .await
            .map_err(map_store_error)
    }

    /// Apply a partial edit to a stored detail record.
    pub async fn update_detail(
        &self,
        owner: &UserId,
        vin: &Vin,
        patch: &VehicleDetailPatch,
    ) -> Result<VehicleDetail, Error> {
        self.vehicles
            .update_detail(vin, owner, patch)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found("vehicle not found"))
    }

    /// Remove a vehicle and its detail.
    pub async fn remove(&self, owner: &UserId, vin: &Vin) -> Result<(), Error> {
        let removed = self
            .vehicles
            .delete(vin, owner)
            .await
            .map_err(map_store_error)?;
        if removed {
            tracing::info!(vin = %vin, owner = %owner, "vehicle removed");
            Ok(())
        } else {
            Err(Error::not_found("vehicle not found"))
        }
    }
}
