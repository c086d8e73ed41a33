//! Domain primitives, use-case services, and ports.
//!
//! Purpose: define strongly typed domain entities used by the HTTP and
//! persistence layers. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod garage;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod vehicle;

pub use self::accounts::AccountService;
pub use self::auth::{AuthValidationError, LoginCredentials, Registration};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::garage::GarageService;
pub use self::trace_id::TraceId;
pub use self::user::{DisplayName, EmailAddress, ProfileUpdate, User, UserId, UserValidationError};
pub use self::vehicle::{
    Turbo, Vehicle, VehicleDetail, VehicleDetailPatch, VehicleId, Vin, VinValidationError,
};

/// Convenient result alias for domain and handler code.
pub type ApiResult<T> = Result<T, Error>;
