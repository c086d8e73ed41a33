//! Port abstraction for vehicle persistence adapters and their errors.
//!
//! The practical lookup key throughout is `(vin, owner)`: duplicate VINs
//! across different users are allowed, a second copy for the same user is
//! not.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::user::UserId;
use crate::domain::vehicle::{
    Vehicle, VehicleDetail, VehicleDetailPatch, VehicleId, Vin,
};

/// Persistence errors raised by vehicle repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VehicleStoreError {
    /// Repository connection could not be established.
    #[error("vehicle repository connection failed: {message}")]
    Connection { message: String },

    /// Query or mutation failed during execution.
    #[error("vehicle repository query failed: {message}")]
    Query { message: String },

    /// The owner already has a vehicle with this VIN.
    #[error("vehicle is already stored for this user")]
    DuplicateVehicle,
}

impl VehicleStoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Persist a vehicle and its decoded detail as one atomic unit: both
    /// rows exist afterwards or neither does.
    async fn save_decoded(
        &self,
        vin: &Vin,
        owner: &UserId,
        detail: &VehicleDetail,
    ) -> Result<Vehicle, VehicleStoreError>;

    /// Fetch a vehicle and its detail by the `(vin, owner)` key.
    async fn find_with_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
    ) -> Result<Option<(Vehicle, VehicleDetail)>, VehicleStoreError>;

    /// List all vehicles stored for the owner.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, VehicleStoreError>;

    /// Apply a partial update to the stored detail. Returns `None` when the
    /// vehicle is absent for that owner.
    async fn update_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
        patch: &VehicleDetailPatch,
    ) -> Result<Option<VehicleDetail>, VehicleStoreError>;

    /// Remove the vehicle and its detail together. Returns `false` when
    /// nothing was stored for that key.
    async fn delete(&self, vin: &Vin, owner: &UserId) -> Result<bool, VehicleStoreError>;
}

#[derive(Debug, Clone)]
struct StoredVehicle {
    vehicle: Vehicle,
    detail: VehicleDetail,
}

/// In-memory vehicle repository backing dev mode and handler tests.
#[derive(Debug, Default)]
pub struct InMemoryVehicleRepository {
    vehicles: Mutex<HashMap<(String, UserId), StoredVehicle>>,
}

impl InMemoryVehicleRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(vin: &Vin, owner: &UserId) -> (String, UserId) {
        (vin.as_ref().to_owned(), *owner)
    }

    fn lock(
        &self,
    ) -> Result<
        std::sync::MutexGuard<'_, HashMap<(String, UserId), StoredVehicle>>,
        VehicleStoreError,
    > {
        self.vehicles
            .lock()
            .map_err(|_| VehicleStoreError::query("vehicle store lock poisoned"))
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn save_decoded(
        &self,
        vin: &Vin,
        owner: &UserId,
        detail: &VehicleDetail,
    ) -> Result<Vehicle, VehicleStoreError> {
        let mut vehicles = self.lock()?;
        let key = Self::key(vin, owner);
        if vehicles.contains_key(&key) {
            return Err(VehicleStoreError::DuplicateVehicle);
        }
        let vehicle = Vehicle::new(VehicleId::random(), *owner, vin.clone());
        vehicles.insert(
            key,
            StoredVehicle {
                vehicle: vehicle.clone(),
                detail: detail.clone(),
            },
        );
        Ok(vehicle)
    }

    async fn find_with_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
    ) -> Result<Option<(Vehicle, VehicleDetail)>, VehicleStoreError> {
        let vehicles = self.lock()?;
        Ok(vehicles
            .get(&Self::key(vin, owner))
            .map(|stored| (stored.vehicle.clone(), stored.detail.clone())))
    }

    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Vehicle>, VehicleStoreError> {
        let vehicles = self.lock()?;
        let mut owned: Vec<Vehicle> = vehicles
            .values()
            .filter(|stored| stored.vehicle.owner() == owner)
            .map(|stored| stored.vehicle.clone())
            .collect();
        owned.sort_by(|a, b| a.vin().as_ref().cmp(b.vin().as_ref()));
        Ok(owned)
    }

    async fn update_detail(
        &self,
        vin: &Vin,
        owner: &UserId,
        patch: &VehicleDetailPatch,
    ) -> Result<Option<VehicleDetail>, VehicleStoreError> {
        let mut vehicles = self.lock()?;
        let Some(stored) = vehicles.get_mut(&Self::key(vin, owner)) else {
            return Ok(None);
        };
        stored.detail = patch.apply(stored.detail.clone());
        Ok(Some(stored.detail.clone()))
    }

    async fn delete(&self, vin: &Vin, owner: &UserId) -> Result<bool, VehicleStoreError> {
        let mut vehicles = self.lock()?;
        Ok(vehicles.remove(&Self::key(vin, owner)).is_some())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the in-memory adapter.
    use super::*;
    use crate::domain::vehicle::Turbo;

    fn vin(raw: &str) -> Vin {
        Vin::new(raw).expect("valid VIN")
    }

    fn detail(make: &str) -> VehicleDetail {
        VehicleDetail {
            make: Some(make.to_owned()),
            year: Some(2023),
            ..VehicleDetail::default()
        }
    }

    #[tokio::test]
    async fn same_vin_different_owners_are_distinct() {
        let repo = InMemoryVehicleRepository::new();
        let (ada, grace) = (UserId::random(), UserId::random());
        let shared = vin("2T3W1RFV3PW284566");

        repo.save_decoded(&shared, &ada, &detail("Toyota"))
            .await
            .expect("ada save");
        repo.save_decoded(&shared, &grace, &detail("Toyota"))
            .await
            .expect("grace save");

        let err = repo
            .save_decoded(&shared, &ada, &detail("Toyota"))
            .await
            .expect_err("second copy for same owner must fail");
        assert_eq!(err, VehicleStoreError::DuplicateVehicle);
    }

    #[tokio::test]
    async fn delete_removes_vehicle_and_detail_together() {
        let repo = InMemoryVehicleRepository::new();
        let owner = UserId::random();
        let v = vin("1HGCM82633A123456");
        repo.save_decoded(&v, &owner, &detail("Honda"))
            .await
            .expect("save");

        assert!(repo.delete(&v, &owner).await.expect("delete"));
        assert!(repo
            .find_with_detail(&v, &owner)
            .await
            .expect("lookup")
            .is_none());
        assert!(!repo.delete(&v, &owner).await.expect("second delete"));
    }

    #[tokio::test]
    async fn update_detail_patches_in_place() {
        let repo = InMemoryVehicleRepository::new();
        let owner = UserId::random();
        let v = vin("1HGCM82633A123456");
        repo.save_decoded(&v, &owner, &detail("Honda"))
            .await
            .expect("save");

        let patch = VehicleDetailPatch {
            turbo: Some(Turbo::Yes),
            ..VehicleDetailPatch::default()
        };
        let updated = repo
            .update_detail(&v, &owner, &patch)
            .await
            .expect("update")
            .expect("vehicle present");
        assert_eq!(updated.turbo, Turbo::Yes);
        assert_eq!(updated.make.as_deref(), Some("Honda"));
    }
}
