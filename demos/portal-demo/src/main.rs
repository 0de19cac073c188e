//! A self-contained walkthrough of the session subsystem.
//!
//! Spins up a miniature portal backend in-process, then drives the full
//! client lifecycle against it: bootstrap, login, guard-checked
//! navigation, a restart that resumes the stored session, a forced
//! logout, and a clean logout. Run with `RUST_LOG=debug` to watch the
//! pipeline and session controller narrate each step.

use caregate::prelude::*;
use caregate::ClientError;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Stub backend
// ---------------------------------------------------------------------------

mod backend {
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::sync::atomic::{AtomicBool, Ordering};

    const TOKEN: &str = "demo-token";

    /// Flips to true when the "admin revokes the session" button is
    /// pressed; from then on every bearer is rejected.
    static REVOKED: AtomicBool = AtomicBool::new(false);

    pub fn revoke_all_sessions() {
        REVOKED.store(true, Ordering::SeqCst);
    }

    fn doctor() -> Value {
        json!({
            "id": "d-1",
            "email": "doctor@healthcare.com",
            "first_name": "Gregory",
            "last_name": "House",
            "user_type": "doctor"
        })
    }

    fn authorized(headers: &HeaderMap) -> bool {
        !REVOKED.load(Ordering::SeqCst)
            && headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                == Some(TOKEN)
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
                    "token": TOKEN,
                    "user": doctor()
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
        if authorized(&headers) {
            (StatusCode::OK, Json(json!({"valid": true, "user": doctor()})))
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or expired token"})),
            )
        }
    }

    async fn appointments(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        if authorized(&headers) {
            (
                StatusCode::OK,
                Json(json!({"appointments": [{"patient": "J. Wilson", "time": "09:30"}]})),
            )
        } else {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Invalid or expired token"})),
            )
        }
    }

    /// Binds on an ephemeral port and returns the API base URL.
    pub async fn spawn() -> String {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/verify-token", post(verify_token))
            .route("/api/doctor/appointments", get(appointments));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind demo backend");
        let addr = listener.local_addr().expect("demo backend addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("demo backend serve");
        });
        format!("http://{addr}/api")
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

fn build_portal(base: &str, credential_path: &std::path::Path) -> Portal {
    Portal::builder()
        .base_url(base)
        .credential_file(credential_path)
        .build()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let base = backend::spawn().await;
    let dir = tempfile::tempdir()?;
    let credential_path = dir.path().join("credential.json");
    println!("backend at {base}, credential file at {}", credential_path.display());

    // --- First launch: nothing stored, login as a doctor ------------------
    let portal = build_portal(&base, &credential_path);
    let state = portal.bootstrap().await?;
    println!("bootstrap: {state}");

    match portal
        .login("doctor@healthcare.com", "doctor123", Role::Doctor)
        .await?
    {
        AuthOutcome::Success { user, .. } => println!("logged in as {}", user.full_name()),
        AuthOutcome::Failure { reason } => {
            println!("login failed: {reason}");
            return Ok(());
        }
    }

    // The guard now routes /login to the doctor home, and refuses
    // patient-only screens.
    println!("navigate /login     -> {}", portal.navigate(Route::Login)?);
    println!("navigate /doctor    -> {}", portal.navigate(Route::DoctorHome)?);
    println!("navigate /screening -> {}", portal.navigate(Route::Screening)?);

    // A gated fetch carries the bearer automatically.
    let schedule: serde_json::Value = portal.api().get_json("/doctor/appointments").await?;
    println!("today's schedule: {schedule}");

    // --- "Restart": a fresh portal over the same credential file ----------
    drop(portal);
    let portal = build_portal(&base, &credential_path);
    let state = portal.bootstrap().await?;
    println!("after restart, bootstrap: {state}");

    // --- Forced logout: the authority revokes every session ---------------
    let mut notices = portal.subscribe_notices();
    backend::revoke_all_sessions();

    let result: Result<serde_json::Value, _> = portal.api().get_json("/doctor/appointments").await;
    match result {
        Err(ClientError::CredentialRejected) => {
            let notice = notices.recv().await?;
            println!("session revoked mid-use: {notice:?}");
            println!("navigate /doctor    -> {}", portal.navigate(Route::DoctorHome)?);
        }
        other => println!("unexpected outcome after revocation: {other:?}"),
    }

    Ok(())
}
