//! End-to-end API flows over the full handler stack.
//!
//! These tests exercise real Actix handlers with the session middleware in
//! place, substituting in-memory adapters for PostgreSQL and the external
//! decoder. They cover the paths a browser client actually takes: register,
//! sign in, store a vehicle, edit its details, and remove it again.

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::{json, Value};

use carlookup::inbound::http::state::HttpState;
use carlookup::inbound::http::{accounts, garage};
use carlookup::Trace;

const VIN: &str = "2T3W1RFV3PW284566";

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api/v1")
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
                .service(garage::remove_vehicle),
        )
}

async fn register<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/register")
            .set_json(json!({
                "name": "Test User",
                "email": email,
                "password": "password",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

#[actix_web::test]
async fn full_garage_lifecycle() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;
    let cookie = register(&app, "ada@test.com").await;

    // Preview first: nothing is stored by a lookup.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vin-lookup")
            .cookie(cookie.clone())
            .set_json(json!({ "vin": VIN }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"]["make"], "Toyota");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/vehicles")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    // Add, then list shows exactly one vehicle with the normalised VIN.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vehicles")
            .cookie(cookie.clone())
            .set_json(json!({ "vin": VIN.to_lowercase() }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/vehicles")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed[0]["vin"], VIN);

    // A second copy of the same VIN is a conflict.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vehicles")
            .cookie(cookie.clone())
            .set_json(json!({ "vin": VIN }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Patch only the year; every other stored field keeps its value.
    let res = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/v1/vehicles/{VIN}"))
            .cookie(cookie.clone())
            .set_json(json!({ "year": 2024 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["detail"]["year"], 2024);
    assert_eq!(body["detail"]["make"], "Toyota");
    assert_eq!(body["detail"]["driveType"], "AWD");

    // Delete, then the detail route answers 404.
    let res = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/vehicles/{VIN}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/vehicles/{VIN}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn vehicles_are_invisible_across_users() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;
    let ada = register(&app, "ada@test.com").await;
    let grace = register(&app, "grace@test.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vehicles")
            .cookie(ada)
            .set_json(json!({ "vin": VIN }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Grace sees neither the vehicle nor its detail.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/vehicles")
            .cookie(grace.clone())
            .to_request(),
    )
    .await;
    let listed: Value = test::read_body_json(res).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/vehicles/{VIN}"))
            .cookie(grace.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // But she can store her own copy of the same VIN.
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vehicles")
            .cookie(grace)
            .set_json(json!({ "vin": VIN }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn unauthenticated_requests_are_rejected() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;

    for request in [
        test::TestRequest::get().uri("/api/v1/vehicles"),
        test::TestRequest::post()
            .uri("/api/v1/vin-lookup")
            .set_json(json!({ "vin": VIN })),
        test::TestRequest::delete().uri(&format!("/api/v1/vehicles/{VIN}")),
    ] {
        let res = test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[actix_web::test]
async fn logout_invalidates_the_session() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;
    let cookie = register(&app, "ada@test.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("purge cookie");
    assert!(cleared.value().is_empty());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/vehicles")
            .cookie(cleared.into_owned())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn login_round_trip_after_logout() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;
    let cookie = register(&app, "ada@test.com").await;

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": "ada@test.com", "password": "password" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned();
    let user: Value = test::read_body_json(res).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/users/{}", user["id"].as_str().expect("id")))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let profile: Value = test::read_body_json(res).await;
    assert_eq!(profile["email"], "ada@test.com");
}

#[actix_web::test]
async fn malformed_vin_is_a_bad_request_with_details() {
    let app = test::init_service(test_app(HttpState::in_memory())).await;
    let cookie = register(&app, "ada@test.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/vin-lookup")
            .cookie(cookie)
            .set_json(json!({ "vin": "SHORT" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "vin");
}
