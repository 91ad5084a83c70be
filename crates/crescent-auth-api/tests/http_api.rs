//! Integration tests for the HTTP auth API client against a mock server.

use crescent_auth_api::{
    ApiError, AuthApi, HttpAuthApi, LoginRequest, LogoutRequest, RegisterRequest, VerifyOtpRequest,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn login_request() -> LoginRequest {
    LoginRequest {
        email: "a@b.com".to_string(),
        password: "Secret1".to_string(),
        device_id: "device-1".to_string(),
        push_token: None,
    }
}

fn user_json() -> serde_json::Value {
    json!({
        "id": "u1",
        "email": "a@b.com",
        "username": "amir",
        "isVerified": true
    })
}

#[tokio::test]
async fn login_returns_token_grant_and_sends_device_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_partial_json(json!({
            "email": "a@b.com",
            "device_id": "device-1"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "token": "t1",
                "user": user_json()
            })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let grant = api.login(&login_request()).await.unwrap();

    assert_eq!(grant.token, "t1");
    assert_eq!(grant.user.id, "u1");
    assert!(grant.user.is_verified);
}

#[tokio::test]
async fn login_failure_surfaces_api_message_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credentials"})),
        )
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let err = api.login(&login_request()).await.unwrap_err();

    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn login_failure_without_message_gets_generic_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>boom</html>"))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let err = api.login(&login_request()).await.unwrap_err();

    match &err {
        ApiError::Api { status, message } => {
            assert_eq!(*status, 500);
            assert_eq!(message, "Request failed with HTTP 500");
        }
        other => panic!("Expected Api error, got {:?}", other),
    }
    assert!(err.is_transient());
}

#[tokio::test]
async fn login_two_hundred_without_token_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json()})))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let err = api.login(&login_request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Malformed(_)), "got {:?}", err);
}

#[tokio::test]
async fn register_reports_status_without_issuing_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_partial_json(json!({"username": "amir"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let response = api
        .register(&RegisterRequest {
            email: "a@b.com".to_string(),
            password: "Secret1".to_string(),
            username: "amir".to_string(),
            device_id: "device-1".to_string(),
            push_token: None,
        })
        .await
        .unwrap();

    assert!(response.is_success());
    assert!(response.message.is_none());
}

#[tokio::test]
async fn verify_otp_accepts_enveloped_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "token": "t2", "user": user_json() }
        })))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let grant = api
        .verify_otp(&VerifyOtpRequest {
            email: "a@b.com".to_string(),
            otp: "123456".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(grant.token, "t2");
    assert_eq!(grant.user.username, "amir");
}

#[tokio::test]
async fn verify_otp_accepts_flat_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "token": "t3",
            "user": user_json()
        })))
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let grant = api
        .verify_otp(&VerifyOtpRequest {
            email: "a@b.com".to_string(),
            otp: "123456".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(grant.token, "t3");
}

#[tokio::test]
async fn verify_otp_rejects_unknown_shape_as_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-otp"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "error", "message": "bad otp"})),
        )
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    let err = api
        .verify_otp(&VerifyOtpRequest {
            email: "a@b.com".to_string(),
            otp: "000000".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Malformed(_)), "got {:?}", err);
}

#[tokio::test]
async fn logout_ignores_response_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .and(body_partial_json(json!({
            "device_id": "device-1",
            "access_token": "t1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string("whatever"))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpAuthApi::new(server.uri()).unwrap();
    api.logout(&LogoutRequest {
        device_id: "device-1".to_string(),
        access_token: "t1".to_string(),
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on this port
    let api = HttpAuthApi::new("http://127.0.0.1:9").unwrap();
    let err = api.login(&login_request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Network(_)), "got {:?}", err);
    assert!(err.is_transient());
}

#[tokio::test]
async fn slow_server_surfaces_as_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "t1", "user": user_json()}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let api = HttpAuthApi::with_timeout(server.uri(), Duration::from_millis(50)).unwrap();
    let err = api.login(&login_request()).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout), "got {:?}", err);
    assert!(err.is_transient());
}
