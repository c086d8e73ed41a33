//! Reqwest-backed VIN decoder adapter.
//!
//! This adapter owns transport details only: URL construction, timeout and
//! HTTP error mapping, and JSON decoding into the domain detail record.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use tracing::warn;
use url::Url;

use super::dto::DecodeResponseDto;
use crate::domain::ports::{VinDecodeError, VinDecoder};
use crate::domain::{VehicleDetail, Vin};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default decode endpoint, appended with `/{vin}?format=json`.
pub const DEFAULT_DECODER_URL: &str = "https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVin";

/// VIN decoder adapter performing HTTP GET requests against one endpoint.
pub struct HttpVinDecoder {
    client: Client,
    base: Url,
}

impl HttpVinDecoder {
    /// Build an adapter with the default 10 second request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn decode_url(&self, vin: &Vin) -> Result<Url, VinDecodeError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| VinDecodeError::transport("decoder URL cannot be a base"))?
            .pop_if_empty()
            .push(vin.as_ref());
        url.set_query(Some("format=json"));
        Ok(url)
    }

    async fn send(&self, url: Url) -> Result<Response, VinDecodeError> {
        self.client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)
    }
}

fn map_transport_error(error: reqwest::Error) -> VinDecodeError {
    if error.is_timeout() {
        VinDecodeError::timeout(error.to_string())
    } else {
        VinDecodeError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> VinDecodeError {
    let message = std::str::from_utf8(body)
        .ok()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("decoder request failed");
    VinDecodeError::status(status.as_u16(), message)
}

#[async_trait]
impl VinDecoder for HttpVinDecoder {
    async fn decode(&self, vin: &Vin) -> Result<VehicleDetail, VinDecodeError> {
        let url = self.decode_url(vin)?;

        // One retry covers transient connection drops; timeouts and HTTP
        // errors are returned as-is since a second attempt would just
        // double the latency of a failing call.
        let response = match self.send(url.clone()).await {
            Ok(response) => response,
            Err(VinDecodeError::Transport { message }) => {
                warn!(%message, vin = %vin, "decoder request failed, retrying once");
                self.send(url).await?
            }
            Err(err) => return Err(err),
        };

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let decoded: DecodeResponseDto = serde_json::from_slice(body.as_ref())
            .map_err(|error| VinDecodeError::decode(format!("invalid decoder JSON: {error}")))?;
        Ok(decoded.into_detail())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder(base: &str) -> HttpVinDecoder {
        HttpVinDecoder::new(Url::parse(base).expect("valid URL")).expect("client")
    }

    #[test]
    fn decode_url_appends_vin_and_format() {
        let vin = Vin::new("2T3W1RFV3PW284566").expect("valid VIN");
        let url = decoder("https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVin")
            .decode_url(&vin)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://vpic.nhtsa.dot.gov/api/vehicles/DecodeVin/2T3W1RFV3PW284566?format=json"
        );
    }

    #[test]
    fn decode_url_tolerates_trailing_slash() {
        let vin = Vin::new("2T3W1RFV3PW284566").expect("valid VIN");
        let url = decoder("http://localhost:8099/DecodeVin/")
            .decode_url(&vin)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://localhost:8099/DecodeVin/2T3W1RFV3PW284566?format=json"
        );
    }

    #[test]
    fn status_errors_carry_the_body_message() {
        let err = map_status_error(StatusCode::BAD_GATEWAY, b"upstream offline");
        assert_eq!(
            err,
            VinDecodeError::status(502, "upstream offline")
        );
    }

    #[test]
    fn blank_status_bodies_get_a_fallback_message() {
        let err = map_status_error(StatusCode::INTERNAL_SERVER_ERROR, b"  ");
        assert_eq!(
            err,
            VinDecodeError::status(500, "decoder request failed")
        );
    }
}
