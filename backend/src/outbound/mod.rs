//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **decoder**: reqwest-backed client for the VIN decoding service
//! - **security**: Argon2 credential hashing
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod decoder;
pub mod persistence;
pub mod security;
