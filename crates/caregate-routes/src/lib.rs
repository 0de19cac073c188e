//! Route authorization for Caregate.
//!
//! Two small, pure pieces:
//!
//! 1. **The role router** ([`home_of`], [`allowed_roles`]) — the single
//!    authority for role → destination and route → permitted-roles
//!    mapping. No other component re-encodes these tables; sidebars,
//!    redirects, and guards all ask here.
//! 2. **The guard** ([`require_session`], [`require_anonymous`],
//!    [`evaluate`]) — per-navigation predicates deciding whether a screen
//!    renders or where the navigation redirects instead.
//!
//! Everything in this crate is a pure function of
//! [`SessionState`](caregate_session::SessionState) and the route table:
//! no network, no storage, no side effects beyond the returned decision.
//! That's what makes the whole authorization story testable as a truth
//! table.

mod guard;
mod route;

pub use guard::{RouteDecision, evaluate, require_anonymous, require_session};
pub use route::{Route, allowed_roles, home_of};
