//! Domain ports: the traits adapters implement.
//!
//! In hexagonal terms these are the seams of the application. Inbound
//! adapters (HTTP handlers) call use-case services which depend only on
//! these traits, so outbound infrastructure (PostgreSQL, the VIN decoding
//! service, Argon2) can be swapped for in-memory fixtures in tests and in
//! dev mode.

mod credential_hasher;
mod user_repository;
mod vehicle_repository;
mod vin_decoder;

pub use credential_hasher::{CredentialHashError, CredentialHasher, PlainTextHasher};
pub use user_repository::{
    InMemoryUserRepository, NewUser, UserAccount, UserRepository, UserStoreError,
};
pub use vehicle_repository::{InMemoryVehicleRepository, VehicleRepository, VehicleStoreError};
pub use vin_decoder::{FixtureVinDecoder, VinDecodeError, VinDecoder};
