//! Request and response bodies for the auth endpoints.
//!
//! These mirror the portal backend's JSON contract field-for-field:
//!
//! | Operation | Method + path             | Success payload        | Failure signal |
//! |-----------|---------------------------|------------------------|----------------|
//! | login     | POST `/auth/login`        | `{token, user, ...}`   | 4xx + `{error}`|
//! | signup    | POST `/auth/signup`       | `{message, user_id}`   | 4xx + `{error}`|
//! | verify    | POST `/auth/verify-token` | `{valid, user}`        | 401            |
//!
//! Only the auth endpoints get typed bodies here. Gated domain resources
//! (dashboards, appointments, screenings) are opaque to the session core
//! and travel through the client's generic JSON verbs.

use serde::{Deserialize, Serialize};

use crate::{Role, UserRecord};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

/// Body of `POST /auth/login`.
///
/// `user_type` is the *claimed* role — the backend rejects the login if the
/// account's actual role differs, so a doctor can't sign in through the
/// patient form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub user_type: Role,
}

/// Success body of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Human-readable status line ("Login successful"). Informational only.
    #[serde(default)]
    pub message: Option<String>,

    /// The minted bearer token.
    pub token: String,

    /// The authenticated user's record (plus role-specific extras the
    /// deserializer ignores).
    pub user: UserRecord,
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

/// Body of `POST /auth/signup`.
///
/// Signup registers **patient accounts only** — the request carries no
/// role field because the server pins `user_type` to patient. Doctors and
/// admins are provisioned out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,

    /// Optional profile fields; omitted from the body when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Success body of `POST /auth/signup`.
///
/// Note there is no token here: signup does not log the user in. The
/// client must follow up with an explicit login.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: String,
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

/// Success body of `POST /auth/verify-token`.
///
/// The request itself has no body — the token under test rides in the
/// `Authorization` header like any other bearer request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserRecord,
}

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

/// The `{"error": "..."}` body every failure path of the backend returns.
///
/// All auth failures (bad password, role mismatch, deactivated account,
/// unapproved doctor, duplicate signup email) arrive in this shape with a
/// 4xx status. The message is user-presentable and passed through as the
/// `Failure` reason.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub error: String,
}

// =========================================================================
// Tests
// =========================================================================
