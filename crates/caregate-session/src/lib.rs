//! Session lifecycle for Caregate.
//!
//! This crate owns the process-wide answer to "who is logged in right
//! now?" as a single explicit value with a documented lifecycle:
//!
//! 1. **State** ([`SessionState`]) — `Unknown` until bootstrap resolves,
//!    then `Anonymous` or `Authenticated`, never `Unknown` again.
//! 2. **Controller** ([`SessionController`]) — the one component allowed
//!    to transition that state. It runs the one-shot bootstrap, performs
//!    login/logout, and listens for the pipeline's credential-rejection
//!    events so that a 401 anywhere becomes a forced logout everywhere.
//!
//! # How it fits in the stack
//!
//! ```text
//! Routes / UI shell (above)  ← watch SessionState, receive SessionNotice
//!     ↕
//! Session layer (this crate) ← the single writer of session state
//!     ↕
//! Client layer (below)       ← auth operations + SessionEvent stream
//! ```

mod controller;
mod error;
mod state;

pub use controller::{SessionController, SessionNotice};
pub use error::SessionError;
pub use state::SessionState;
