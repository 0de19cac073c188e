//! Durable credential storage for Caregate.
//!
//! This crate is the single source of truth for "is anyone logged in."
//! It exposes exactly three verbs through the [`CredentialStore`] trait:
//!
//! 1. **save** — persist a token + user pair
//! 2. **clear** — forget it
//! 3. **read** — report what's there, if anything
//!
//! No other component may write persisted session state; every mutation in
//! the whole system funnels through these two mutating operations. There is
//! deliberately no network access here — pure storage.
//!
//! # Implementations
//!
//! - [`FileStore`] — a JSON document on disk; survives process restarts.
//!   This is what a desktop/CLI deployment of the portal client uses.
//! - [`MemoryStore`] — in-process only; for tests and demos.
//!
//! # Atomicity
//!
//! The core invariant: token and user are set or cleared **together**.
//! Both implementations persist the pair as one [`Credential`] document,
//! so a torn state (token without user, or vice versa) is unrepresentable.

mod error;
mod file;
mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use store::{CredentialStore, MemoryStore};
