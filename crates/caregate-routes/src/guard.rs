//! The route authorization guard: pure predicates over session state.
//!
//! Evaluated per navigation attempt, and **only after the bootstrapper
//! has resolved the session** — the shell never calls in here while the
//! state is `Unknown` (it shows the loading affordance instead). That
//! ordering is what prevents a flash of gated content or a wrong
//! redirect off stale, unverified local state.

use caregate_protocol::Role;
use caregate_session::SessionState;

use crate::{Route, allowed_roles, home_of};

/// The outcome of a guard evaluation.
///
/// Guards don't navigate and don't mutate; they *decide*. The shell
/// either renders the requested screen or follows the redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Render the requested screen.
    Permit,
    /// Render this destination instead.
    Redirect(Route),
}

impl RouteDecision {
    /// The route actually rendered when `requested` was asked for.
    pub fn resolve(self, requested: Route) -> Route {
        match self {
            RouteDecision::Permit => requested,
            RouteDecision::Redirect(target) => target,
        }
    }
}

/// Guards a screen that needs an authenticated session, optionally
/// restricted to a subset of roles.
///
/// - Not authenticated → redirect to login.
/// - Authenticated but the role isn't in `allowed` → redirect to the
///   unauthorized screen.
/// - Otherwise → permit.
pub fn require_session(
    state: &SessionState,
    allowed: Option<&[Role]>,
) -> RouteDecision {
    debug_assert!(
        state.is_resolved(),
        "guard evaluated before bootstrap completed"
    );

    let Some(role) = state.role() else {
        return RouteDecision::Redirect(Route::Login);
    };

    match allowed {
        Some(allowed) if !allowed.contains(&role) => {
            RouteDecision::Redirect(Route::Unauthorized)
        }
        _ => RouteDecision::Permit,
    }
}

/// Guards a screen that only makes sense while logged out (login,
/// signup). An authenticated session is sent to its own home instead —
/// never to another role's, and never left on the login form.
pub fn require_anonymous(state: &SessionState) -> RouteDecision {
    debug_assert!(
        state.is_resolved(),
        "guard evaluated before bootstrap completed"
    );

    match state.role() {
        Some(role) => RouteDecision::Redirect(home_of(role)),
        None => RouteDecision::Permit,
    }
}

/// The per-navigation entry point: picks the right predicate for the
/// requested route and the role table that applies to it.
pub fn evaluate(state: &SessionState, route: Route) -> RouteDecision {
    match route {
        // Anonymous-only screens.
        Route::Login | Route::Signup => require_anonymous(state),
        // Informational screens anyone may see.
        Route::Unauthorized | Route::NotFound => RouteDecision::Permit,
        // Everything else is gated, restricted per the role table.
        gated => require_session(state, allowed_roles(gated)),
    }
}

// =========================================================================
// Tests
// =========================================================================
