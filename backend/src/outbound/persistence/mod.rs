//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! The adapters are thin translators: Diesel row structs (`models.rs`) and
//! schema definitions (`schema.rs`) stay internal, and every database error
//! is mapped to a domain store error.

mod diesel_user_repository;
mod diesel_vehicle_repository;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use diesel_vehicle_repository::DieselVehicleRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
