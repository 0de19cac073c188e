//! Data model and wire contract for Caregate.
//!
//! This crate defines the "language" the portal client and the remote
//! authority speak:
//!
//! - **Types** ([`Role`], [`UserRecord`], [`Credential`], [`AuthOutcome`]) —
//!   the session-owning data structures every other layer shares.
//! - **Wire shapes** ([`LoginRequest`], [`VerifyResponse`], [`ApiError`],
//!   etc.) — the exact JSON bodies the auth endpoints exchange.
//! - **Errors** ([`ProtocolError`]) — what can go wrong at the data
//!   boundary, most importantly a role value outside the closed enumeration.
//!
//! # Architecture
//!
//! The protocol layer sits below everything else. It doesn't know about
//! HTTP, storage, or routing — it only knows what the data looks like.
//!
//! ```text
//! Routes / Session (above)  ← consume Role, UserRecord, SessionState inputs
//!     ↕
//! Client / Store (middle)   ← move Credential and wire shapes around
//!     ↕
//! Protocol (this crate)     ← defines all of them
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod types;
mod wire;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

// `pub use` flattens the public API so users write
// `use caregate_protocol::Role` instead of `caregate_protocol::types::Role`.

pub use error::ProtocolError;
pub use types::{AuthOutcome, Credential, Role, UserRecord};
pub use wire::{
    ApiError, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
    VerifyResponse,
};
