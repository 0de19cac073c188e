//! End-to-end tests for the assembled portal: bootstrap, login,
//! guard-checked navigation, durable sessions across restarts, and the
//! global forced logout. Everything runs against an in-process stub
//! backend and a real on-disk credential file.

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use caregate::prelude::*;
use caregate::{ClientError, SessionError};

// =========================================================================
// Stub portal backend
// =========================================================================

const DOCTOR_TOKEN: &str = "doctor-token";

fn doctor_json() -> Value {
    json!({
        "id": "d-1",
        "email": "doctor@healthcare.com",
        "first_name": "Gregory",
        "last_name": "House",
        "user_type": "doctor"
    })
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["email"].as_str() == Some("doctor@healthcare.com")
        && body["password"].as_str() == Some("doctor123")
        && body["user_type"].as_str() == Some("doctor")
    {
        (
            StatusCode::OK,
            Json(json!({
                "message": "Login successful",
                "token": DOCTOR_TOKEN,
                "user": doctor_json()
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
    }
}

async fn verify_token(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if bearer(&headers) == Some(DOCTOR_TOKEN) {
        (
            StatusCode::OK,
            Json(json!({"valid": true, "user": doctor_json()})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid or expired token"})),
        )
    }
}

async fn doctor_appointments(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if bearer(&headers) == Some(DOCTOR_TOKEN) {
        (StatusCode::OK, Json(json!({"appointments": []})))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Token is invalid"})),
        )
    }
}

/// Every bearer is rejected here: the authority has revoked the session.
async fn revoked(_headers: HeaderMap) -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"error": "Invalid or expired token"})),
    )
}

async fn spawn_portal_backend() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify-token", post(verify_token))
        .route("/api/doctor/appointments", get(doctor_appointments))
        .route("/api/admin/reports", get(revoked));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend serve");
    });
    format!("http://{addr}/api")
}

fn file_portal(base: &str, dir: &tempfile::TempDir) -> Portal {
    Portal::builder()
        .base_url(base)
        .credential_file(dir.path().join("credential.json"))
        .build()
}

async fn login_as_doctor(portal: &Portal) {
    let outcome = portal
        .login("doctor@healthcare.com", "doctor123", Role::Doctor)
        .await
        .unwrap();
    assert!(outcome.is_success(), "stub login should succeed");
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_navigate_before_bootstrap_is_refused() {
    let base = spawn_portal_backend().await;
    let portal = Portal::builder().base_url(&base).build();

    // The shell must keep its loading affordance up: no guard decisions
    // off an Unknown state.
    let result = portal.navigate(Route::DoctorHome);
    assert!(matches!(
        result,
        Err(caregate::CaregateError::Session(
            SessionError::NotBootstrapped
        ))
    ));
}

#[tokio::test]
async fn test_full_login_flow_reaches_role_home() {
    let base = spawn_portal_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let portal = file_portal(&base, &dir);

    // Fresh machine: nothing stored, bootstrap resolves anonymous.
    assert_eq!(portal.bootstrap().await.unwrap(), SessionState::Anonymous);

    // Gated screens redirect to login while anonymous...
    assert_eq!(portal.navigate(Route::DoctorHome).unwrap(), Route::Login);
    // ...and the login screen itself renders.
    assert_eq!(portal.navigate(Route::Login).unwrap(), Route::Login);

    login_as_doctor(&portal).await;

    // Authenticated doctor: login redirects home, home renders, and
    // patient-only screens are refused.
    assert_eq!(portal.home(), Some(Route::DoctorHome));
    assert_eq!(portal.navigate(Route::Login).unwrap(), Route::DoctorHome);
    assert_eq!(
        portal.navigate(Route::DoctorHome).unwrap(),
        Route::DoctorHome
    );
    assert_eq!(
        portal.navigate(Route::Screening).unwrap(),
        Route::Unauthorized
    );

    // The pipeline carries the bearer on gated fetches.
    let appointments: Value = portal
        .api()
        .get_json("/doctor/appointments")
        .await
        .expect("gated fetch with fresh session");
    assert!(appointments["appointments"].is_array());
}

#[tokio::test]
async fn test_session_survives_restart_via_credential_file() {
    let base = spawn_portal_backend().await;
    let dir = tempfile::tempdir().unwrap();

    {
        let portal = file_portal(&base, &dir);
        portal.bootstrap().await.unwrap();
        login_as_doctor(&portal).await;
    } // portal dropped: "process exit"

    // A fresh portal over the same credential file finds and re-verifies
    // the stored session.
    let portal = file_portal(&base, &dir);
    let state = portal.bootstrap().await.unwrap();

    assert!(state.is_authenticated());
    assert_eq!(state.role(), Some(Role::Doctor));
    assert_eq!(portal.navigate(Route::Login).unwrap(), Route::DoctorHome);
}

#[tokio::test]
async fn test_forced_logout_redirects_all_navigation_to_login() {
    let base = spawn_portal_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let portal = file_portal(&base, &dir);
    portal.bootstrap().await.unwrap();
    login_as_doctor(&portal).await;
    let mut notices = portal.subscribe_notices();

    // Any screen's in-flight call can be the one that learns the session
    // is dead; here it's a report fetch the authority rejects.
    let result: Result<Value, _> = portal.api().get_json("/admin/reports").await;
    assert!(matches!(result, Err(ClientError::CredentialRejected)));

    let notice = tokio::time::timeout(Duration::from_secs(2), notices.recv())
        .await
        .expect("forced-logout notice should arrive")
        .unwrap();
    assert_eq!(notice, SessionNotice::ForcedLogout);

    // The session is over everywhere: state, store, and every subsequent
    // navigation agree.
    assert_eq!(portal.state(), SessionState::Anonymous);
    assert_eq!(portal.home(), None);
    assert_eq!(portal.navigate(Route::DoctorHome).unwrap(), Route::Login);
}

#[tokio::test]
async fn test_logout_then_login_screen_renders_again() {
    let base = spawn_portal_backend().await;
    let portal = Portal::builder().base_url(&base).build();
    portal.bootstrap().await.unwrap();
    login_as_doctor(&portal).await;

    portal.logout().unwrap();
    portal.logout().unwrap(); // idempotent

    assert_eq!(portal.state(), SessionState::Anonymous);
    assert_eq!(portal.navigate(Route::Login).unwrap(), Route::Login);
}
