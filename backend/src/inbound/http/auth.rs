//! Registration and login endpoints.
//!
//! ```text
//! POST /api/v1/auth/register {"firstName":"Ann","lastName":"Lee","email":"ann@example.com","password":"..."}
//! POST /api/v1/auth/login {"email":"ann@example.com","password":"..."}
//! ```

use actix_web::{HttpResponse, post, web};

use crate::domain::{LoginCredentials, UserDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Create an account and return a session token.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<UserDraft>,
) -> ApiResult<HttpResponse> {
    let token = state.credentials.register(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(token))
}

/// Exchange credentials for a session token.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginCredentials>,
) -> ApiResult<HttpResponse> {
    let token = state.credentials.authenticate(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(token))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, web};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::MockCredentialsCommand;
    use crate::domain::token::SUBJECT_CLAIM;
    use crate::domain::{Error, ErrorCode};
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::inbound::http::test_utils::{TestApp, api_app, mocked_ports};
    use crate::test_support::token_issuer;

    fn registration(email: &str) -> Value {
        json!({
            "firstName": "Ann",
            "lastName": "Lee",
            "email": email,
            "password": "correct-horse"
        })
    }

    #[actix_web::test]
    async fn register_returns_created_token_for_the_new_user() {
        let harness = TestApp::new();
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(registration("Ann@Example.com"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        let token = body["token"].as_str().expect("token string");
        let claims = harness.tokens.verify(token).expect("token verifies");

        let stored = harness.stored_user("ann@example.com").await;
        assert_eq!(claims[SUBJECT_CLAIM], json!(stored.id.to_string()));
    }

    #[actix_web::test]
    async fn duplicate_registration_conflicts() {
        let harness = TestApp::new();
        let app = actix_test::init_service(harness.app()).await;

        for (email, expected) in [
            ("foo@example.com", StatusCode::CREATED),
            ("FOO@example.com ", StatusCode::CONFLICT),
        ] {
            let req = actix_test::TestRequest::post()
                .uri("/api/v1/auth/register")
                .set_json(registration(email))
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), expected);
        }
    }

    #[actix_web::test]
    async fn missing_field_is_reported_by_name() {
        let harness = TestApp::new();
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "firstName": "Ann", "lastName": "Lee", "password": "pw" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "email");
    }

    #[rstest]
    #[case("ann@example.com", "correct-horse", StatusCode::OK)]
    #[case("ann@example.com", "wrong", StatusCode::UNAUTHORIZED)]
    #[case("nobody@example.com", "correct-horse", StatusCode::UNAUTHORIZED)]
    #[case("garbage", "correct-horse", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn login_outcomes(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: StatusCode,
    ) {
        let harness = TestApp::new();
        let app = actix_test::init_service(harness.app()).await;
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(registration("ann@example.com"))
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), expected);
        let body: Value = actix_test::read_body_json(res).await;
        if expected == StatusCode::OK {
            assert!(body["token"].is_string());
        } else {
            assert_eq!(body["code"], json!(ErrorCode::Unauthorized));
            assert_eq!(body["message"], "invalid credentials");
        }
    }

    #[actix_web::test]
    async fn malformed_json_is_a_bad_request() {
        let harness = TestApp::new();
        let app = actix_test::init_service(harness.app()).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
    }

    #[actix_web::test]
    async fn unavailable_storage_maps_to_503() {
        let tokens = token_issuer(None);
        let mut credentials = MockCredentialsCommand::new();
        credentials
            .expect_register()
            .times(1)
            .return_once(|_| Err(Error::service_unavailable("user repository unavailable")));
        let state = HttpState::new(HttpStatePorts {
            credentials: Arc::new(credentials),
            ..mocked_ports(&tokens)
        });
        let app = actix_test::init_service(api_app(web::Data::new(state))).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(registration("ann@example.com"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
