//! Backend entry-point: wires REST endpoints, persistence, and OpenAPI docs.

use std::sync::Arc;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{web, App, HttpServer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use carlookup::doc::ApiDoc;
use carlookup::inbound::http::health::{live, ready, HealthState};
use carlookup::inbound::http::state::HttpState;
use carlookup::inbound::http::{accounts, garage};
use carlookup::outbound::decoder::HttpVinDecoder;
use carlookup::outbound::persistence::{
    DbPool, DieselUserRepository, DieselVehicleRepository, PoolConfig,
};
use carlookup::outbound::security::Argon2Hasher;
use carlookup::server::ServerConfig;
use carlookup::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = ServerConfig::from_env()?;
    let state = build_state(&config).await?;

    let key = config.key.clone();
    let cookie_secure = config.cookie_secure;
    let same_site = config.same_site;

    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let session = SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(cookie_secure)
            .cookie_http_only(true)
            .cookie_same_site(same_site)
            .build();

        let api = web::scope("/api/v1")
            .wrap(session)
            .service(accounts::register)
            .service(accounts::login)
            .service(accounts::logout)
            .service(accounts::profile)
            .service(accounts::update_profile)
            .service(garage::vin_lookup)
            .service(garage::list_vehicles)
            .service(garage::add_vehicle)
            .service(garage::vehicle_detail)
            .service(garage::update_vehicle_detail)
            .service(garage::remove_vehicle);

        #[cfg_attr(not(debug_assertions), expect(unused_mut))]
        let mut app = App::new()
            .app_data(server_health_state.clone())
            .app_data(web::Data::new(state.clone()))
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        {
            app = app
                .service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
        }

        app
    })
    .bind(config.bind_addr)?;

    health_state.mark_ready();
    server.run().await
}

/// Wire the dependency bundle from configuration.
///
/// With `DATABASE_URL` set, repositories run on PostgreSQL, credentials on
/// Argon2, and decoding on the external service. Without it the server
/// falls back to in-memory fixtures so local development needs no
/// infrastructure.
async fn build_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let Some(database_url) = config.database_url.as_deref() else {
        warn!("DATABASE_URL unset, running on in-memory fixtures");
        return Ok(HttpState::in_memory());
    };

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;
    let decoder = HttpVinDecoder::new(config.decoder_url.clone())
        .map_err(|e| std::io::Error::other(format!("failed to build decoder client: {e}")))?;

    info!(decoder_url = %config.decoder_url, "connected to database");
    Ok(HttpState::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(Argon2Hasher),
        Arc::new(DieselVehicleRepository::new(pool)),
        Arc::new(decoder),
    ))
}
