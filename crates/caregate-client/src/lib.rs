//! Authenticated HTTP plumbing for Caregate.
//!
//! This crate owns two things:
//!
//! 1. **The request pipeline** ([`ApiClient`]) — every outbound call the
//!    portal makes goes through it. It attaches the stored bearer token,
//!    and it reacts to credential rejection (HTTP 401) uniformly: clear
//!    the store, broadcast a [`SessionEvent::CredentialRejected`], and
//!    fail the call. The pipeline itself never navigates — UI concerns
//!    belong to whoever subscribes to the event stream.
//! 2. **The auth operations** ([`AuthClient`]) — login, signup, logout,
//!    verify, current-user. These are the only operations that
//!    legitimately *write* the credential store, and every one of them
//!    returns an outcome value rather than panicking or escaping with an
//!    unhandled error.
//!
//! # How it fits in the stack
//!
//! ```text
//! Session layer (above)   ← calls AuthClient, subscribes to SessionEvent
//!     ↕
//! Client layer (this crate)  ← HTTP + credential attachment + 401 policy
//!     ↕
//! Store / Protocol (below)   ← credential persistence, wire shapes
//! ```

mod auth;
mod error;
mod event;
mod pipeline;

pub use auth::{AuthClient, SignupOutcome, VerifyOutcome};
pub use error::ClientError;
pub use event::SessionEvent;
pub use pipeline::ApiClient;
