//! Wire types for the vPIC-style VIN decoding service.
//!
//! The service answers `DecodeVin/{vin}?format=json` with a `Results` array
//! of `{Variable, Value}` pairs. Values are strings throughout, with `""`,
//! `"0"`, and `"Not Applicable"` all meaning "nothing known"; numeric
//! fields arrive as decimal strings.

use serde::Deserialize;

use crate::domain::{Turbo, VehicleDetail};

/// Top-level decode response.
#[derive(Debug, Deserialize)]
pub(crate) struct DecodeResponseDto {
    #[serde(rename = "Results", default)]
    pub results: Vec<DecodeResultDto>,
}

/// One decoded variable.
#[derive(Debug, Deserialize)]
pub(crate) struct DecodeResultDto {
    #[serde(rename = "Variable")]
    pub variable: Option<String>,
    #[serde(rename = "Value")]
    pub value: Option<String>,
}

fn clean(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != "0" && !v.eq_ignore_ascii_case("Not Applicable"))
}

fn parse_int(value: Option<&str>) -> Option<i32> {
    clean(value).and_then(|v| v.parse().ok())
}

fn own(value: Option<&str>) -> Option<String> {
    clean(value).map(str::to_owned)
}

impl DecodeResponseDto {
    /// Fold the variable list into a normalised detail record.
    ///
    /// Unrecognised variables are ignored; when the service repeats a
    /// variable the last occurrence wins.
    pub(crate) fn into_detail(self) -> VehicleDetail {
        let mut detail = VehicleDetail::default();
        for result in &self.results {
            let Some(variable) = result.variable.as_deref() else {
                continue;
            };
            let value = result.value.as_deref();
            match variable {
                "Model Year" => detail.year = parse_int(value),
                "Make" => detail.make = own(value),
                "Model" => detail.model = own(value),
                "Trim" => detail.trim = own(value),
                "Top Speed" => detail.top_speed = parse_int(value),
                "Engine Number of Cylinders" => detail.cylinders = own(value),
                "Engine HP" => detail.horsepower = own(value),
                "Turbo" => detail.turbo = Turbo::from_decoder_value(clean(value)),
                "Engine Model" => detail.engine_model = own(value),
                "Fuel Type - Primary" => detail.fuel_type = own(value),
                "Transmission Style" => detail.transmission_style = own(value),
                "Drive Type" => detail.drive_type = own(value),
                _ => {}
            }
        }
        detail
    }
}
