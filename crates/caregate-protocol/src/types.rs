//! Core session types: who a user is and what an auth operation produced.
//!
//! These are the structures every other layer shares. The store persists a
//! [`Credential`], the client produces [`AuthOutcome`]s, the session layer
//! carries a [`UserRecord`], and the route layer dispatches on [`Role`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The closed role enumeration determining access scope.
///
/// Every authenticated user is exactly one of these. The set is closed on
/// purpose: there is no `Other(String)` escape hatch, so a role value the
/// client doesn't know about **cannot be constructed** — it fails at the
/// wire or storage boundary with [`ProtocolError::UnknownRole`] (or a serde
/// decode error) instead of being silently coerced to a guessed default.
///
/// `#[serde(rename_all = "lowercase")]` pins the wire strings to exactly
/// `"admin"`, `"doctor"`, `"patient"` — the values the portal backend stores
/// in its `user_type` field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Portal administrator: manages doctors, patients, and appointments.
    Admin,
    /// Medical staff: reviews appointments and screening results.
    Doctor,
    /// End user: books appointments and submits screenings.
    Patient,
}

impl Role {
    /// All roles, in a fixed order. Handy for exhaustive tests and for
    /// building role tables without re-listing the variants.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Patient];

    /// The wire string for this role (`"admin"`, `"doctor"`, `"patient"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
        }
    }
}

/// Parses a wire string into a role.
///
/// This is the single chokepoint where free-form role strings enter the
/// typed world. Anything outside the enumeration is an error, never a
/// default.
impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            other => Err(ProtocolError::UnknownRole(other.to_string())),
        }
    }
}

/// Display prints the wire string, so `tracing::info!(%role, ...)` logs
/// `doctor` rather than `Doctor`.
impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRecord
// ---------------------------------------------------------------------------

/// The identity record of an authenticated user.
///
/// Created by the remote authority at login/signup time; the client treats
/// it as read-only. The backend's login payload carries extra profile
/// fields (phone, specialization, date_of_birth, ...) depending on role —
/// serde ignores unknown fields by default, so those pass through the
/// deserializer without being owned by the session core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-assigned identifier. Opaque to the client.
    pub id: String,

    /// Login email, unique per account (server-enforced).
    pub email: String,

    pub first_name: String,
    pub last_name: String,

    /// The role this account was created with. Field name matches the
    /// backend's `user_type` column, so no serde rename is needed.
    pub user_type: Role,
}

impl UserRecord {
    /// Convenience for greetings and log lines: `"Ada Lovelace"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// The token + user pair representing an authenticated session.
///
/// Owned exclusively by the credential store. The invariant that matters:
/// token and user are always **set or cleared together** — a reader must
/// never observe a token with no matching user or vice versa. The store
/// guarantees this by persisting the pair as a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The bearer token. Opaque: the client never inspects or decodes it,
    /// it only presents it in the `Authorization` header.
    pub token: String,

    /// The user this token authenticates.
    pub user: UserRecord,
}

// ---------------------------------------------------------------------------
// AuthOutcome
// ---------------------------------------------------------------------------

/// The value result of an auth operation.
///
/// Every auth-client operation returns this shape rather than raising a
/// control-flow error, so callers handle both branches uniformly:
///
/// ```text
/// match client.login(...).await {
///     AuthOutcome::Success { user, .. } => /* render user's home */,
///     AuthOutcome::Failure { reason }   => /* show the message */,
/// }
/// ```
///
/// A `Failure` here is a *business* rejection (bad password, role mismatch,
/// unapproved doctor account) or a transport problem folded into a
/// user-presentable message. It is never a crash path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The authority accepted the credentials and minted a token.
    Success {
        user: UserRecord,
        token: String,
    },

    /// The authority rejected the request, or it never got there.
    /// `reason` is the server's `error` message when one was given,
    /// otherwise a generic fallback.
    Failure { reason: String },
}

impl AuthOutcome {
    /// Returns `true` for the `Success` branch.
    pub fn is_success(&self) -> bool {
        matches!(self, AuthOutcome::Success { .. })
    }

    /// The failure reason, if this is a `Failure`.
    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            AuthOutcome::Failure { reason } => Some(reason),
            AuthOutcome::Success { .. } => None,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for the core types and their JSON representation.
    //!
    //! The backend defines exact JSON shapes (`user_type: "doctor"` etc.).
    //! These tests pin our serde attributes to that format, because a
    //! mismatch means the client can't parse real responses.

    use super::*;

    fn doctor_record() -> UserRecord {
        UserRecord {
            id: "64f1c0ffee".into(),
            email: "doctor@healthcare.com".into(),
            first_name: "Gregory".into(),
            last_name: "House".into(),
            user_type: Role::Doctor,
        }
    }

    // =====================================================================
    // Role
    // =====================================================================

    #[test]
    fn test_role_serializes_as_lowercase_string() {
        // `rename_all = "lowercase"` means Role::Admin → "admin",
        // matching the backend's user_type values exactly.
        let json = serde_json::to_string(&Role::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let json = serde_json::to_string(&Role::Patient).unwrap();
        assert_eq!(json, "\"patient\"");
    }

    #[test]
    fn test_role_deserializes_from_wire_string() {
        let role: Role = serde_json::from_str("\"doctor\"").unwrap();
        assert_eq!(role, Role::Doctor);
    }

    #[test]
    fn test_role_from_str_rejects_unknown_role() {
        // "nurse" is outside the closed enumeration. The error must carry
        // the offending value so the defect is diagnosable.
        let err = "nurse".parse::<Role>().unwrap_err();
        assert!(
            matches!(&err, ProtocolError::UnknownRole(v) if v == "nurse"),
            "expected UnknownRole(\"nurse\"), got {err:?}"
        );
        assert!(err.to_string().contains("nurse"));
    }

    #[test]
    fn test_role_from_str_rejects_wrong_case() {
        // The wire contract is lowercase; "Doctor" is not a valid wire
        // value and coercing it would mask a misbehaving producer.
        assert!("Doctor".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_deserialize_rejects_unknown_role() {
        // The same closed-set rule holds at the serde boundary.
        let result: Result<Role, _> = serde_json::from_str("\"nurse\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_role_display_matches_as_str() {
        for role in Role::ALL {
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_role_round_trips_through_from_str() {
        for role in Role::ALL {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    // =====================================================================
    // UserRecord
    // =====================================================================

    #[test]
    fn test_user_record_deserializes_backend_payload() {
        // The exact shape the backend's login/verify endpoints return.
        let json = r#"{
            "id": "64f1c0ffee",
            "email": "doctor@healthcare.com",
            "first_name": "Gregory",
            "last_name": "House",
            "user_type": "doctor"
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user, doctor_record());
    }

    #[test]
    fn test_user_record_ignores_role_specific_extras() {
        // Login responses for doctors carry specialization, license info,
        // etc. The session core doesn't own those fields; they must not
        // break deserialization.
        let json = r#"{
            "id": "64f1c0ffee",
            "email": "doctor@healthcare.com",
            "first_name": "Gregory",
            "last_name": "House",
            "user_type": "doctor",
            "phone": "555-0100",
            "specialization": "Neurology",
            "experience_years": 20
        }"#;
        let user: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(user.user_type, Role::Doctor);
    }

    #[test]
    fn test_user_record_rejects_unknown_user_type() {
        // A "nurse" record cannot enter the typed world at all.
        let json = r#"{
            "id": "1", "email": "n@x.com",
            "first_name": "N", "last_name": "N",
            "user_type": "nurse"
        }"#;
        let result: Result<UserRecord, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_user_record_full_name() {
        assert_eq!(doctor_record().full_name(), "Gregory House");
    }

    // =====================================================================
    // Credential
    // =====================================================================

    #[test]
    fn test_credential_round_trip() {
        let cred = Credential {
            token: "eyJhbGciOi.abc.def".into(),
            user: doctor_record(),
        };
        let bytes = serde_json::to_vec(&cred).unwrap();
        let decoded: Credential = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cred, decoded);
    }

    // =====================================================================
    // AuthOutcome
    // =====================================================================

    #[test]
    fn test_auth_outcome_success_accessors() {
        let outcome = AuthOutcome::Success {
            user: doctor_record(),
            token: "tok".into(),
        };
        assert!(outcome.is_success());
        assert_eq!(outcome.failure_reason(), None);
    }

    #[test]
    fn test_auth_outcome_failure_accessors() {
        let outcome = AuthOutcome::Failure {
            reason: "Invalid credentials".into(),
        };
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_reason(), Some("Invalid credentials"));
    }
}
