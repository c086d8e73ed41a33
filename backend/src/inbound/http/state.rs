//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the use-case services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CredentialHasher, UserRepository, VehicleRepository, VinDecoder,
};
use crate::domain::{AccountService, GarageService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<AccountService>,
    pub garage: Arc<GarageService>,
}

impl HttpState {
    /// Wire the services from their port implementations.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
        vehicles: Arc<dyn VehicleRepository>,
        decoder: Arc<dyn VinDecoder>,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(users, hasher)),
            garage: Arc::new(GarageService::new(vehicles, decoder)),
        }
    }

    /// State backed entirely by in-memory fixtures: dev mode and tests.
    #[must_use]
    pub fn in_memory() -> Self {
        use crate::domain::ports::{
            FixtureVinDecoder, InMemoryUserRepository, InMemoryVehicleRepository, PlainTextHasher,
        };
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(PlainTextHasher),
            Arc::new(InMemoryVehicleRepository::new()),
            Arc::new(FixtureVinDecoder),
        )
    }
}
