//! # Caregate
//!
//! The session & authorization subsystem of a role-segmented healthcare
//! portal client: patients, doctors, and an admin authenticate against a
//! remote authority, and every screen of the portal inherits a shared
//! request pipeline, a single session state machine, and role-gated
//! navigation.
//!
//! The portal's screens themselves (dashboards, booking forms, screening
//! upload) are external collaborators: they consume the session state and
//! the pipeline, nothing more. This workspace owns what must hold true
//! *across* all of them:
//!
//! - one durable credential, set and cleared atomically;
//! - a bearer token on every authenticated request;
//! - one uniform reaction to credential rejection, wherever it strikes;
//! - role-gated navigation decided by one authority.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use caregate::prelude::*;
//!
//! # async fn run() -> Result<(), caregate::CaregateError> {
//! let portal = Portal::builder()
//!     .base_url("http://localhost:5001/api")
//!     .credential_file("~/.caregate/credential.json")
//!     .build();
//!
//! // Resolve the stored session before any screen renders.
//! let state = portal.bootstrap().await?;
//!
//! if !state.is_authenticated() {
//!     match portal.login("doctor@healthcare.com", "doctor123", Role::Doctor).await? {
//!         AuthOutcome::Success { user, .. } => println!("hello, {}", user.full_name()),
//!         AuthOutcome::Failure { reason } => eprintln!("{reason}"),
//!     }
//! }
//!
//! // Navigation is guard-checked: this renders the doctor home, or the
//! // login screen if the session is gone.
//! let rendered = portal.navigate(Route::DoctorHome)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod portal;

pub use error::CaregateError;
pub use portal::{Portal, PortalBuilder};

// Re-export the layer crates' surface so `caregate` alone is enough for
// most users.
pub use caregate_client::{
    ApiClient, AuthClient, ClientError, SessionEvent, SignupOutcome,
    VerifyOutcome,
};
pub use caregate_protocol::{
    AuthOutcome, Credential, ProtocolError, Role, SignupRequest, UserRecord,
};
pub use caregate_routes::{
    Route, RouteDecision, allowed_roles, evaluate, home_of,
    require_anonymous, require_session,
};
pub use caregate_session::{
    SessionController, SessionError, SessionNotice, SessionState,
};
pub use caregate_store::{CredentialStore, FileStore, MemoryStore, StoreError};

/// The everyday names, importable in one line.
pub mod prelude {
    pub use crate::{
        AuthOutcome, CredentialStore, Portal, Role, Route, RouteDecision,
        SessionNotice, SessionState, UserRecord,
    };
}
