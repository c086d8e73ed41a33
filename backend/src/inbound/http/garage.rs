//! Garage API handlers: VIN lookup and the vehicle CRUD surface.
//!
//! ```text
//! POST   /api/v1/vin-lookup {"vin":"2T3W1RFV3PW284566"}
//! GET    /api/v1/vehicles
//! POST   /api/v1/vehicles {"vin":"2T3W1RFV3PW284566"}
//! GET    /api/v1/vehicles/{vin}
//! PATCH  /api/v1/vehicles/{vin} {"year":2023}
//! DELETE /api/v1/vehicles/{vin}
//! ```
//!
//! All routes act on the session user's garage; vehicles belonging to
//! other users are simply absent from this surface.

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, Turbo, Vehicle, VehicleDetail, VehicleDetailPatch, Vin, VinValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Request body carrying a VIN.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VinRequest {
    #[schema(example = "2T3W1RFV3PW284566")]
    pub vin: String,
}

/// A decoded or stored detail record together with its VIN.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetailResponse {
    #[schema(example = "2T3W1RFV3PW284566")]
    pub vin: String,
    pub detail: VehicleDetail,
}

/// Partial vehicle-detail edit. Absent and blank fields keep their stored
/// values; `turbo` accepts `yes`, `no`, or `unspecified`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailRequest {
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub trim: Option<String>,
    pub top_speed: Option<i32>,
    pub cylinders: Option<String>,
    pub horsepower: Option<String>,
    pub turbo: Option<Turbo>,
    pub engine_model: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission_style: Option<String>,
    pub drive_type: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

impl From<UpdateDetailRequest> for VehicleDetailPatch {
    fn from(value: UpdateDetailRequest) -> Self {
        Self {
            year: value.year,
            make: non_empty(value.make),
            model: non_empty(value.model),
            trim: non_empty(value.trim),
            top_speed: value.top_speed,
            cylinders: non_empty(value.cylinders),
            horsepower: non_empty(value.horsepower),
            turbo: value.turbo,
            engine_model: non_empty(value.engine_model),
            fuel_type: non_empty(value.fuel_type),
            transmission_style: non_empty(value.transmission_style),
            drive_type: non_empty(value.drive_type),
        }
    }
}

fn map_vin_error(err: VinValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "field": "vin" }))
}

fn parse_vin(raw: &str) -> ApiResult<Vin> {
    Vin::new(raw).map_err(map_vin_error)
}

/// Preview the detail record for a VIN without storing anything.
#[utoipa::path(
    post,
    path = "/api/v1/vin-lookup",
    request_body = VinRequest,
    responses(
        (status = 200, description = "Decoded detail", body = VehicleDetailResponse),
        (status = 400, description = "Invalid VIN", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Decoder unavailable", body = Error)
    ),
    tags = ["garage"],
    operation_id = "vinLookup"
)]
#[post("/vin-lookup")]
pub async fn vin_lookup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VinRequest>,
) -> ApiResult<web::Json<VehicleDetailResponse>> {
    let owner = session.require_user_id()?;
    let vin = parse_vin(&payload.vin)?;
    let detail = state.garage.lookup(&owner, &vin).await?;
    Ok(web::Json(VehicleDetailResponse {
        vin: vin.to_string(),
        detail,
    }))
}

/// List the session user's vehicles.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles",
    responses(
        (status = 200, description = "Vehicles", body = [Vehicle]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["garage"],
    operation_id = "listVehicles"
)]
#[get("/vehicles")]
pub async fn list_vehicles(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Vehicle>>> {
    let owner = session.require_user_id()?;
    let vehicles = state.garage.list(&owner).await?;
    Ok(web::Json(vehicles))
}

/// Decode a VIN and add the vehicle to the session user's garage.
#[utoipa::path(
    post,
    path = "/api/v1/vehicles",
    request_body = VinRequest,
    responses(
        (status = 201, description = "Vehicle added", body = VehicleDetailResponse),
        (status = 400, description = "Invalid VIN", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 409, description = "Vehicle already stored", body = Error),
        (status = 503, description = "Decoder unavailable", body = Error)
    ),
    tags = ["garage"],
    operation_id = "addVehicle"
)]
#[post("/vehicles")]
pub async fn add_vehicle(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<VinRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let vin = parse_vin(&payload.vin)?;
    let (vehicle, detail) = state.garage.add_vehicle(&owner, &vin).await?;
    Ok(HttpResponse::Created().json(VehicleDetailResponse {
        vin: vehicle.vin().to_string(),
        detail,
    }))
}

/// Fetch the stored detail for one of the session user's vehicles.
#[utoipa::path(
    get,
    path = "/api/v1/vehicles/{vin}",
    params(("vin" = String, Path, description = "Vehicle identification number")),
    responses(
        (status = 200, description = "Stored detail", body = VehicleDetailResponse),
        (status = 400, description = "Invalid VIN", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["garage"],
    operation_id = "vehicleDetail"
)]
#[get("/vehicles/{vin}")]
pub async fn vehicle_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<VehicleDetailResponse>> {
    let owner = session.require_user_id()?;
    let vin = parse_vin(&path.into_inner())?;
    let detail = state.garage.detail(&owner, &vin).await?;
    Ok(web::Json(VehicleDetailResponse {
        vin: vin.to_string(),
        detail,
    }))
}

/// Apply a partial edit to a stored detail record.
#[utoipa::path(
    patch,
    path = "/api/v1/vehicles/{vin}",
    params(("vin" = String, Path, description = "Vehicle identification number")),
    request_body = UpdateDetailRequest,
    responses(
        (status = 200, description = "Updated detail", body = VehicleDetailResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["garage"],
    operation_id = "updateVehicleDetail"
)]
#[patch("/vehicles/{vin}")]
pub async fn update_vehicle_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateDetailRequest>,
) -> ApiResult<web::Json<VehicleDetailResponse>> {
    let owner = session.require_user_id()?;
    let vin = parse_vin(&path.into_inner())?;
    let patch = VehicleDetailPatch::from(payload.into_inner());
    let detail = state.garage.update_detail(&owner, &vin, &patch).await?;
    Ok(web::Json(VehicleDetailResponse {
        vin: vin.to_string(),
        detail,
    }))
}

/// Remove a vehicle (and its detail) from the session user's garage.
#[utoipa::path(
    delete,
    path = "/api/v1/vehicles/{vin}",
    params(("vin" = String, Path, description = "Vehicle identification number")),
    responses(
        (status = 204, description = "Vehicle removed"),
        (status = 400, description = "Invalid VIN", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["garage"],
    operation_id = "removeVehicle"
)]
#[delete("/vehicles/{vin}")]
pub async fn remove_vehicle(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let vin = parse_vin(&path.into_inner())?;
    state.garage.remove(&owner, &vin).await?;
    Ok(HttpResponse::NoContent().finish())
}
