//! `Portal` facade: wires the layers together.
//!
//! This is the one construction site for the whole subsystem. The
//! builder picks a credential store and a backend URL; `build()` stacks
//! pipeline → auth client → session controller on top of it, and the
//! resulting [`Portal`] is what a UI shell holds on to.

use std::path::PathBuf;
use std::sync::Arc;

use caregate_client::{ApiClient, AuthClient, SignupOutcome};
use caregate_protocol::{AuthOutcome, Role, SignupRequest};
use caregate_routes::{Route, evaluate, home_of};
use caregate_session::{SessionController, SessionError, SessionNotice, SessionState};
use caregate_store::{CredentialStore, FileStore, MemoryStore};
use tokio::sync::{broadcast, watch};

use crate::CaregateError;

/// Builder for configuring and assembling a [`Portal`].
pub struct PortalBuilder {
    base_url: String,
    store: Option<Arc<dyn CredentialStore>>,
}

impl PortalBuilder {
    /// Creates a builder with default settings: local backend, in-memory
    /// credential store.
    pub fn new() -> Self {
        Self {
            base_url: "http://localhost:5001/api".to_string(),
            store: None,
        }
    }

    /// Sets the remote authority's base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Uses the given credential store.
    pub fn store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Persists the credential to a JSON file at `path` — the durable
    /// option, so sessions survive a restart.
    pub fn credential_file(self, path: impl Into<PathBuf>) -> Self {
        self.store(Arc::new(FileStore::new(path)))
    }

    /// Assembles the portal. Spawns the session controller's rejection
    /// listener, so this must run inside a Tokio runtime.
    pub fn build(self) -> Portal {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let api = ApiClient::new(self.base_url, store);
        let controller = SessionController::new(AuthClient::new(api));
        Portal { controller }
    }
}

impl Default for PortalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled session & authorization subsystem.
///
/// Cheap to clone; all clones share the same session.
#[derive(Clone)]
pub struct Portal {
    controller: Arc<SessionController>,
}

impl Portal {
    /// Creates a new builder.
    pub fn builder() -> PortalBuilder {
        PortalBuilder::new()
    }

    // -- Session lifecycle -------------------------------------------------

    /// Resolves the stored session against the remote authority. Call
    /// once, before the first navigation; see
    /// [`SessionController::bootstrap`].
    pub async fn bootstrap(&self) -> Result<SessionState, CaregateError> {
        Ok(self.controller.bootstrap().await?)
    }

    /// Logs in with the given credentials and claimed role.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role_hint: Role,
    ) -> Result<AuthOutcome, CaregateError> {
        Ok(self.controller.login(email, password, role_hint).await?)
    }

    /// Registers a patient account (does not log in).
    pub async fn signup(
        &self,
        profile: &SignupRequest,
    ) -> Result<SignupOutcome, CaregateError> {
        Ok(self.controller.signup(profile).await?)
    }

    /// Ends the session. Idempotent.
    pub fn logout(&self) -> Result<(), CaregateError> {
        Ok(self.controller.logout()?)
    }

    // -- Observation -------------------------------------------------------

    /// A snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    /// Watches session-state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.controller.subscribe()
    }

    /// Subscribes to forced-logout / logged-out notices. The shell maps
    /// either variant to a hard navigation to [`Route::Login`].
    pub fn subscribe_notices(&self) -> broadcast::Receiver<SessionNotice> {
        self.controller.subscribe_notices()
    }

    /// The pipeline, for gated-resource calls
    /// (`portal.api().get_json("/patient/dashboard")`).
    pub fn api(&self) -> &ApiClient {
        self.controller.auth().api()
    }

    // -- Navigation --------------------------------------------------------

    /// Applies the route guard to a navigation attempt and returns the
    /// route actually rendered (the requested one, or the redirect
    /// target).
    ///
    /// Errors with [`SessionError::NotBootstrapped`] while the state is
    /// still `Unknown`: the shell must keep showing the loading
    /// affordance instead of asking.
    pub fn navigate(&self, route: Route) -> Result<Route, CaregateError> {
        let state = self.controller.state();
        if !state.is_resolved() {
            return Err(SessionError::NotBootstrapped.into());
        }
        let rendered = evaluate(&state, route).resolve(route);
        if rendered != route {
            tracing::debug!(requested = %route, rendered = %rendered, "navigation redirected");
        }
        Ok(rendered)
    }

    /// The current session's home destination, if authenticated.
    pub fn home(&self) -> Option<Route> {
        self.controller.state().role().map(home_of)
    }
}
