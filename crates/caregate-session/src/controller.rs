//! The session controller: the single writer of session state.
//!
//! Every mutation of [`SessionState`] funnels through this type:
//!
//! - the one-shot **bootstrap** that reconciles the stored credential
//!   against the remote authority before any gated screen may render;
//! - explicit **login / logout**;
//! - the **rejection listener**, a background task that turns the
//!   pipeline's `CredentialRejected` broadcast into a forced logout.
//!
//! Observers never write. The UI shell watches the state channel and
//! subscribes to [`SessionNotice`]s for redirects it didn't initiate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{broadcast, watch};

use caregate_client::{AuthClient, SessionEvent, VerifyOutcome};
use caregate_protocol::{AuthOutcome, Role, SignupRequest};

use crate::{SessionError, SessionState};

/// Capacity of the notice channel; notices are rare and tiny.
const NOTICE_CHANNEL_CAPACITY: usize = 16;

/// A session change the current screen didn't ask for.
///
/// The pipeline announces 401s as events; this controller translates the
/// first one into a state transition and exactly one `ForcedLogout`
/// notice. The UI shell maps either variant to a hard navigation to the
/// login screen (the route layer owns the destination).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionNotice {
    /// The credential was rejected mid-session. The store is already
    /// cleared and the state already `Anonymous` when this is observed.
    ForcedLogout,

    /// The user logged out explicitly.
    LoggedOut,
}

/// Owns the session state machine.
///
/// Construct once per process with [`SessionController::new`]; share via
/// the returned `Arc`. Dropping the last `Arc` stops the rejection
/// listener.
pub struct SessionController {
    auth: AuthClient,
    state_tx: watch::Sender<SessionState>,
    notice_tx: broadcast::Sender<SessionNotice>,
    bootstrapped: AtomicBool,
}

impl SessionController {
    /// Creates the controller and spawns its rejection listener.
    pub fn new(auth: AuthClient) -> Arc<Self> {
        let (state_tx, _) = watch::channel(SessionState::Unknown);
        let (notice_tx, _) = broadcast::channel(NOTICE_CHANNEL_CAPACITY);

        let controller = Arc::new(Self {
            auth,
            state_tx,
            notice_tx,
            bootstrapped: AtomicBool::new(false),
        });

        // The listener holds a Weak so the controller's lifetime is
        // governed by its real owners, not by its own background task.
        let weak = Arc::downgrade(&controller);
        let mut events = controller.auth.api().subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        let Some(controller) = weak.upgrade() else {
                            break;
                        };
                        controller.on_session_event(event);
                    }
                    // Lagging only skips redundant repeats; the first
                    // rejection already transitioned the state.
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        controller
    }

    // -- Observation -------------------------------------------------------

    /// A snapshot of the current state.
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Watches state transitions. The receiver starts at the current
    /// value; `changed()` resolves on each transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Subscribes to forced-logout / logged-out notices.
    pub fn subscribe_notices(&self) -> broadcast::Receiver<SessionNotice> {
        self.notice_tx.subscribe()
    }

    /// The auth client this controller drives, for gated-resource calls.
    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    // -- Bootstrap ---------------------------------------------------------

    /// Reconciles the stored credential against the remote authority and
    /// resolves the session state. Runs exactly once, at process start,
    /// before any gated screen is permitted to render.
    ///
    /// - no stored credential → `Anonymous`;
    /// - stored and verified → `Authenticated` with the authority's
    ///   (fresh) user record;
    /// - stored but rejected → store cleared, `Anonymous`;
    /// - authority unreachable → `Anonymous` for this run, credential
    ///   retained so a later restart can still validate it.
    ///
    /// Until this returns, the UI must show a neutral loading affordance
    /// and must not evaluate any route guard.
    pub async fn bootstrap(&self) -> Result<SessionState, SessionError> {
        if self.bootstrapped.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AlreadyBootstrapped);
        }

        match self.resolve_initial_state().await {
            Ok(resolved) => {
                tracing::info!(state = %resolved, "session bootstrapped");
                self.state_tx.send_replace(resolved.clone());
                Ok(resolved)
            }
            Err(e) => {
                // Bootstrap didn't complete; allow a retry instead of
                // wedging the process in Unknown forever.
                self.bootstrapped.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    async fn resolve_initial_state(
        &self,
    ) -> Result<SessionState, SessionError> {
        let Some(stored) = self.auth.api().store().read()? else {
            return Ok(SessionState::Anonymous);
        };

        match self.auth.verify().await {
            Ok(VerifyOutcome {
                valid: true,
                user: Some(user),
            }) => Ok(SessionState::Authenticated(user)),
            Ok(_) => {
                // The authority said no: the stored credential is stale.
                // Clear it so the next boot doesn't re-ask.
                tracing::info!(
                    email = %stored.user.email,
                    "stored credential rejected at bootstrap; clearing"
                );
                self.auth.api().store().clear()?;
                Ok(SessionState::Anonymous)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "authority unreachable at bootstrap; resolving anonymous, credential retained"
                );
                Ok(SessionState::Anonymous)
            }
        }
    }

    // -- Explicit transitions ----------------------------------------------

    /// Logs in and, on success, transitions to `Authenticated`.
    ///
    /// The outcome is a value either way; a `Failure` leaves the state
    /// untouched for the login screen to re-render with the reason.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role_hint: Role,
    ) -> Result<AuthOutcome, SessionError> {
        self.ensure_bootstrapped()?;

        let outcome = self.auth.login(email, password, role_hint).await;
        if let AuthOutcome::Success { user, .. } = &outcome {
            self.state_tx
                .send_replace(SessionState::Authenticated(user.clone()));
        }
        Ok(outcome)
    }

    /// Registers a patient account. Pure pass-through: signup never
    /// changes session state (the new patient still has to log in).
    pub async fn signup(
        &self,
        profile: &SignupRequest,
    ) -> Result<caregate_client::SignupOutcome, SessionError> {
        self.ensure_bootstrapped()?;
        Ok(self.auth.signup(profile).await)
    }

    /// Ends the session: clears the store, transitions to `Anonymous`,
    /// and emits [`SessionNotice::LoggedOut`]. Idempotent.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.ensure_bootstrapped()?;

        self.auth.logout()?;
        self.state_tx.send_replace(SessionState::Anonymous);
        let _ = self.notice_tx.send(SessionNotice::LoggedOut);
        Ok(())
    }

    fn ensure_bootstrapped(&self) -> Result<(), SessionError> {
        if self.bootstrapped.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SessionError::NotBootstrapped)
        }
    }

    // -- Rejection listener ------------------------------------------------

    fn on_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::CredentialRejected => {
                // First 401 wins. The transition guard makes every
                // subsequent rejection (concurrent in-flight calls, late
                // arrivals from screens the user already left) a
                // redundant no-op: exactly one ForcedLogout notice goes
                // out per session.
                let transitioned = self.state_tx.send_if_modified(|state| {
                    if state.is_authenticated() {
                        *state = SessionState::Anonymous;
                        true
                    } else {
                        false
                    }
                });
                if transitioned {
                    tracing::warn!("credential rejected; forcing logout");
                    let _ = self.notice_tx.send(SessionNotice::ForcedLogout);
                }
            }
            // logout() already performed the transition and notice; the
            // event is informational here.
            SessionEvent::LoggedOut => {}
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
