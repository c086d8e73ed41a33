//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the domain
//! schemas they reference, and the session cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, Turbo, User, Vehicle, VehicleDetail};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::inbound::http::garage::{UpdateDetailRequest, VehicleDetailResponse, VinRequest};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Garage backend API",
        description = "Session-authenticated VIN decoding and per-user vehicle storage."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::accounts::update_profile,
        crate::inbound::http::garage::vin_lookup,
        crate::inbound::http::garage::list_vehicles,
        crate::inbound::http::garage::add_vehicle,
        crate::inbound::http::garage::vehicle_detail,
        crate::inbound::http::garage::update_vehicle_detail,
        crate::inbound::http::garage::remove_vehicle,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Vehicle,
        VehicleDetail,
        Turbo,
        RegisterRequest,
        LoginRequest,
        UpdateProfileRequest,
        VinRequest,
        VehicleDetailResponse,
        UpdateDetailRequest,
    )),
    tags(
        (name = "accounts", description = "Registration, login, and profile management"),
        (name = "garage", description = "VIN lookup and per-user vehicle storage"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
