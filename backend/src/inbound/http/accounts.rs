//! Account API handlers: registration, login, logout, profile view/edit.
//!
//! ```text
//! POST /api/v1/register {"name":"Ada","email":"ada@example.com","password":"secret1"}
//! POST /api/v1/login    {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/logout
//! GET  /api/v1/users/{id}
//! PUT  /api/v1/users/{id} {"name":"Ada","email":"ada@example.com"}
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    AuthValidationError, Error, LoginCredentials, ProfileUpdate, Registration, User, UserId,
    UserValidationError,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AuthValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            value.profile_pic.as_deref(),
            &value.password,
        )
    }
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = AuthValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Profile edit body for `PUT /api/v1/users/{id}`. An absent or blank
/// picture clears the stored one (whole-profile semantics, unlike the
/// field-wise vehicle patch).
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_pic: Option<String>,
}

fn map_auth_validation_error(err: AuthValidationError) -> Error {
    let field = match &err {
        AuthValidationError::Email(_) => "email",
        AuthValidationError::Name(_) => "name",
        AuthValidationError::EmptyPassword | AuthValidationError::PasswordLength { .. } => {
            "password"
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_profile_validation_error(err: UserValidationError) -> Error {
    let field = match &err {
        UserValidationError::EmptyDisplayName | UserValidationError::DisplayNameTooLong { .. } => {
            "name"
        }
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

/// Register a new account and establish a session for it.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    let user = state.accounts.register(&registration).await?;
    session.persist_user(user.id())?;
    Ok(HttpResponse::Created().json(user))
}

/// Authenticate and establish a session. Wrong email and wrong password
/// are indistinguishable to the client.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_auth_validation_error)?;
    match state.accounts.authenticate(&credentials).await? {
        Some(user) => {
            session.persist_user(user.id())?;
            Ok(HttpResponse::Ok().json(user))
        }
        None => Err(Error::unauthorized("invalid email/password")),
    }
}

/// Clear the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::Ok().finish())
}

/// Fetch a user's profile. Only the user themselves may view it.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Profile", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "profile"
)]
#[get("/users/{id}")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<User>> {
    let requested = UserId::from_uuid(path.into_inner());
    session.require_owner(&requested)?;
    let user = state
        .accounts
        .profile(&requested)
        .await?
        .ok_or_else(|| Error::not_found("user not found"))?;
    Ok(web::Json(user))
}

/// Apply a whole-profile edit. Only the user themselves may do this.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User identifier")),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "updateProfile"
)]
#[put("/users/{id}")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<User>> {
    let requested = UserId::from_uuid(path.into_inner());
    session.require_owner(&requested)?;

    let body = payload.into_inner();
    let update = ProfileUpdate {
        name: crate::domain::DisplayName::new(body.name).map_err(map_profile_validation_error)?,
        email: crate::domain::EmailAddress::new(body.email)
            .map_err(map_profile_validation_error)?,
        profile_pic: body
            .profile_pic
            .map(|pic| pic.trim().to_owned())
            .filter(|pic| !pic.is_empty()),
    };

    let user = state.accounts.update_profile(&requested, &update).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, web, App};
    use serde_json::Value;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(HttpState::in_memory()))
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(login)
                    .service(logout)
                    .service(profile)
                    .service(update_profile),
            )
    }

    fn register_body(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Test User".into(),
            email: email.into(),
            profile_pic: None,
            password: "password".into(),
        }
    }

    #[actix_web::test]
    async fn register_creates_account_and_session() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("new@test.com"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        assert!(res
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["email"], "new@test.com");
    }

    #[actix_web::test]
    async fn duplicate_registration_is_a_conflict() {
        let app = actix_test::init_service(test_app()).await;
        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/register")
                    .set_json(register_body("dup@test.com"))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), expected);
        }
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorised() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("ada@test.com"))
                .to_request(),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginRequest {
                    email: "ada@test.com".into(),
                    password: "wrong-password".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn profile_of_another_user_is_forbidden() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("ada@test.com"))
                .to_request(),
        )
        .await;
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();

        let other = Uuid::new_v4();
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{other}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn register_rejects_malformed_email_with_field_details() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(register_body("not-an-email"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }
}
