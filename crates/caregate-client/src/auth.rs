//! The auth operations: the only legitimate writers of the credential
//! store.
//!
//! Every operation here returns an outcome **value**. A failed login is
//! not an error to propagate — it's one of the two branches every caller
//! must handle. The single deliberate exception to "errors are values" in
//! this subsystem is the global 401 reaction, and that lives in the
//! pipeline, not here.

use reqwest::Method;

use caregate_protocol::{
    AuthOutcome, Credential, LoginRequest, LoginResponse, Role,
    SignupRequest, SignupResponse, UserRecord, VerifyResponse,
};

use crate::pipeline::OnReject;
use crate::{ApiClient, ClientError, SessionEvent};

/// Generic reasons shown when the server gave no message of its own.
/// Matching the portal's tone: short, user-presentable, no internals.
const GENERIC_LOGIN_FAILURE: &str = "Login failed";
const GENERIC_SIGNUP_FAILURE: &str = "Signup failed";
const PERSIST_FAILURE: &str = "Signed in, but the session could not be saved";

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// The value result of a signup attempt.
///
/// Signup never mints a token — registration and authentication are
/// separate steps, and the client must call
/// [`AuthClient::login`] explicitly afterwards. Hence this is its own
/// two-branch shape rather than reusing [`AuthOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    /// The authority created the patient account.
    Created { user_id: String },
    /// The authority rejected the registration (duplicate email, missing
    /// field, ...), or it was unreachable.
    Failure { reason: String },
}

/// The answer to "is the stored token still accepted?".
///
/// Produced by [`AuthClient::verify`]. Note what this is *not*: a state
/// transition. Verify never mutates the store — the bootstrapper (its
/// only state-changing caller) decides what an invalid result means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Whether the remote authority still accepts the stored token.
    pub valid: bool,
    /// The authoritative user record, present only when `valid`.
    pub user: Option<UserRecord>,
}

impl VerifyOutcome {
    fn invalid() -> Self {
        Self {
            valid: false,
            user: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AuthClient
// ---------------------------------------------------------------------------

/// The auth operations, layered on the request pipeline.
///
/// Cheap to clone (see [`ApiClient`]). All clones share one store and one
/// event stream.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    /// Wraps an existing pipeline.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// The underlying pipeline, for gated-resource calls.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Attempts to log in with the given credentials and claimed role.
    ///
    /// On success the returned credential is persisted before this
    /// returns, so a `Success` outcome means the session is durably
    /// established. On any rejection — bad credentials, role mismatch,
    /// deactivated account, unapproved doctor — nothing is persisted and
    /// the server's message comes back as the failure reason.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role_hint: Role,
    ) -> AuthOutcome {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            user_type: role_hint,
        };
        let body = match serde_json::to_value(&request) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "login request failed to encode");
                return AuthOutcome::Failure {
                    reason: GENERIC_LOGIN_FAILURE.to_string(),
                };
            }
        };

        // Report, not Escalate: a 401 here means "wrong password", not
        // "your session died" — there is no session yet.
        let response: Result<LoginResponse, _> = self
            .api
            .send_json(Method::POST, "/auth/login", Some(&body), OnReject::Report)
            .await;

        match response {
            Ok(LoginResponse { token, user, .. }) => {
                let credential = Credential {
                    token,
                    user: user.clone(),
                };
                if let Err(e) = self.api.store().save(&credential) {
                    // The authority accepted us but the session can't
                    // outlive this call. Treat as a failure rather than
                    // half-establishing a session.
                    tracing::error!(error = %e, "credential save failed after login");
                    return AuthOutcome::Failure {
                        reason: PERSIST_FAILURE.to_string(),
                    };
                }
                tracing::info!(email = %user.email, role = %user.user_type, "login succeeded");
                AuthOutcome::Success {
                    token: credential.token,
                    user,
                }
            }
            Err(ClientError::Api { reason, status }) => {
                tracing::info!(status, "login rejected");
                AuthOutcome::Failure { reason }
            }
            Err(e) => {
                tracing::warn!(error = %e, "login did not complete");
                AuthOutcome::Failure {
                    reason: GENERIC_LOGIN_FAILURE.to_string(),
                }
            }
        }
    }

    /// Registers a new patient account.
    ///
    /// The server is the sole authority on uniqueness and validation.
    /// Deliberately does **not** log the new user in: the store is
    /// untouched regardless of outcome.
    pub async fn signup(&self, profile: &SignupRequest) -> SignupOutcome {
        let body = match serde_json::to_value(profile) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(error = %e, "signup request failed to encode");
                return SignupOutcome::Failure {
                    reason: GENERIC_SIGNUP_FAILURE.to_string(),
                };
            }
        };

        let response: Result<SignupResponse, _> = self
            .api
            .send_json(Method::POST, "/auth/signup", Some(&body), OnReject::Report)
            .await;

        match response {
            Ok(created) => {
                tracing::info!(user_id = %created.user_id, "patient account created");
                SignupOutcome::Created {
                    user_id: created.user_id,
                }
            }
            Err(ClientError::Api { reason, .. }) => {
                SignupOutcome::Failure { reason }
            }
            Err(e) => {
                tracing::warn!(error = %e, "signup did not complete");
                SignupOutcome::Failure {
                    reason: GENERIC_SIGNUP_FAILURE.to_string(),
                }
            }
        }
    }

    /// Ends the current session: clears the store and announces
    /// [`SessionEvent::LoggedOut`].
    ///
    /// Idempotent — logging out with no active session repeats the same
    /// end state (store empty, event emitted) without error. No network
    /// call: the bearer token simply stops being presented.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.api.store().clear()?;
        self.api.emit(SessionEvent::LoggedOut);
        tracing::info!("logged out");
        Ok(())
    }

    /// Asks the remote authority whether the stored token is still
    /// accepted.
    ///
    /// Three-way answer:
    /// - `Ok` with `valid: true` — token accepted; the authoritative
    ///   user record rides along.
    /// - `Ok` with `valid: false` — the authority said no (or nothing is
    ///   stored locally). The store is **not** touched; the caller owns
    ///   that decision.
    /// - `Err` — the question couldn't be asked (network down, 5xx).
    ///   Distinct from "no" so the bootstrapper doesn't discard a
    ///   possibly-good credential over a flaky connection.
    pub async fn verify(&self) -> Result<VerifyOutcome, ClientError> {
        if self.api.store().read()?.is_none() {
            // Nothing to verify; don't bother the network.
            return Ok(VerifyOutcome::invalid());
        }

        let response: Result<VerifyResponse, _> = self
            .api
            .send_json(
                Method::POST,
                "/auth/verify-token",
                None,
                OnReject::Report,
            )
            .await;

        match response {
            Ok(VerifyResponse { valid, user }) => Ok(VerifyOutcome {
                valid,
                user: Some(user),
            }),
            // 401: token rejected. 404: token decodes but the account is
            // gone. Both are authoritative "no"s.
            Err(ClientError::Api {
                status: 401 | 404, ..
            }) => Ok(VerifyOutcome::invalid()),
            Err(e) => Err(e),
        }
    }

    /// The currently stored user, if anyone is logged in.
    ///
    /// A synchronous store read — never network I/O, so screens can call
    /// it freely while rendering.
    pub fn current_user(&self) -> Result<Option<UserRecord>, ClientError> {
        Ok(self.api.store().read()?.map(|c| c.user))
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Tests for the paths that don't need a live endpoint. The full
    //! login/verify/reject flows run against an in-process stub server
    //! in `tests/auth_flow.rs`.

    use std::sync::Arc;

    use caregate_store::{CredentialStore, MemoryStore};

    use super::*;

    fn auth_client() -> AuthClient {
        // The base URL is never contacted by these tests.
        AuthClient::new(ApiClient::new(
            "http://127.0.0.1:9",
            Arc::new(MemoryStore::new()),
        ))
    }

    #[test]
    fn test_logout_with_no_session_is_noop() {
        let auth = auth_client();

        auth.logout().unwrap();
        auth.logout().unwrap();

        assert!(auth.api().store().read().unwrap().is_none());
    }

    #[test]
    fn test_logout_emits_logged_out_event() {
        let auth = auth_client();
        let mut rx = auth.api().subscribe();

        auth.logout().unwrap();

        assert_eq!(rx.try_recv().unwrap(), SessionEvent::LoggedOut);
    }

    #[tokio::test]
    async fn test_verify_with_empty_store_short_circuits() {
        // No credential stored → invalid without a network round trip.
        // (The client points at a dead port; reaching the network would
        // error, not return Ok.)
        let auth = auth_client();

        let outcome = auth.verify().await.unwrap();

        assert!(!outcome.valid);
        assert!(outcome.user.is_none());
    }

    #[test]
    fn test_current_user_reads_store_without_network() {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthClient::new(ApiClient::new(
            "http://127.0.0.1:9",
            store.clone(),
        ));
        assert!(auth.current_user().unwrap().is_none());

        let credential = Credential {
            token: "t".into(),
            user: UserRecord {
                id: "1".into(),
                email: "patient@healthcare.com".into(),
                first_name: "Pat".into(),
                last_name: "Ient".into(),
                user_type: Role::Patient,
            },
        };
        store.save(&credential).unwrap();

        assert_eq!(auth.current_user().unwrap(), Some(credential.user));
    }
}
