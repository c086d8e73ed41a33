//! Driven port for the external VIN decoding service.

use async_trait::async_trait;

use crate::domain::vehicle::{Turbo, VehicleDetail, Vin};

/// Failures raised by decoder adapters.
///
/// A reachable service that simply omits variables is *not* an error; the
/// adapter returns a detail record with `None` fields instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VinDecodeError {
    /// The decoding service could not be reached.
    #[error("decoder transport failed: {message}")]
    Transport { message: String },

    /// The request exceeded the configured timeout.
    #[error("decoder timed out: {message}")]
    Timeout { message: String },

    /// The service answered with a non-success status.
    #[error("decoder returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body was not the expected JSON shape.
    #[error("decoder response could not be decoded: {message}")]
    Decode { message: String },
}

impl VinDecodeError {
    /// Create a transport error with the given message.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a timeout error with the given message.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create a status error with the given status and message.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    /// Create a decode error with the given message.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Domain port for translating a VIN into a normalised detail record.
#[async_trait]
pub trait VinDecoder: Send + Sync {
    /// Decode a VIN via the external service.
    async fn decode(&self, vin: &Vin) -> Result<VehicleDetail, VinDecodeError>;
}

/// Canned decoder used in dev mode so the server runs without network
/// access. Every VIN decodes to the same compact record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureVinDecoder;

#[async_trait]
impl VinDecoder for FixtureVinDecoder {
    async fn decode(&self, _vin: &Vin) -> Result<VehicleDetail, VinDecodeError> {
        Ok(VehicleDetail {
            year: Some(2023),
            make: Some("Toyota".to_owned()),
            model: Some("RAV4".to_owned()),
            cylinders: Some("4".to_owned()),
            fuel_type: Some("Gasoline".to_owned()),
            drive_type: Some("AWD".to_owned()),
            turbo: Turbo::No,
            ..VehicleDetail::default()
        })
    }
}
