//! The session state value and its lifecycle.

use caregate_protocol::{Role, UserRecord};

/// The process-wide session state.
///
/// This is a state machine with three states and a one-way door out of
/// the first:
///
/// ```text
///   Unknown ──(bootstrap)──→ Anonymous ──(login)──→ Authenticated
///      │                         ↑                        │
///      └──(bootstrap)────────────│───(logout / forced)────┘
///                                 no path back to Unknown
/// ```
///
/// - **Unknown**: process start; the bootstrapper hasn't reconciled the
///   stored credential against the authority yet. No route guard may be
///   evaluated in this state — the UI shows a neutral loading affordance
///   instead, so stale local state can neither flash gated content nor
///   cause a wrong redirect.
/// - **Anonymous**: nobody is logged in. Public screens only.
/// - **Authenticated**: a verified user with a known [`Role`]. The
///   carried record is a short-lived copy for rendering and routing; the
///   credential store remains the source of truth.
///
/// `Unknown` is left exactly once, and only the bootstrapper does it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Bootstrap has not completed yet.
    Unknown,

    /// No authenticated session.
    Anonymous,

    /// An established, verified session for this user.
    Authenticated(UserRecord),
}

impl SessionState {
    /// `true` once the bootstrapper has resolved the state either way.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionState::Unknown)
    }

    /// `true` for an established session.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// The authenticated user's role, if any.
    pub fn role(&self) -> Option<Role> {
        self.user().map(|u| u.user_type)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::Unknown => write!(f, "unknown"),
            SessionState::Anonymous => write!(f, "anonymous"),
            SessionState::Authenticated(user) => {
                write!(f, "authenticated({})", user.user_type)
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
