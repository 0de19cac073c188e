//! Session events emitted by the pipeline and auth operations.

/// A notification that the session just ended outside the caller's
/// control flow.
///
/// The pipeline does not navigate and does not own UI state; it only
/// *announces*. The session controller subscribes to this stream and
/// translates events into state transitions and redirect notices. This is
/// the one place where something happens to the session that the calling
/// screen didn't ask for, and it happens as an explicit event rather than
/// a side effect buried in response handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A bearer-authenticated request came back 401. The store has
    /// already been cleared when this event is observed. Terminal for
    /// the session, not for any individual screen: it does not matter
    /// which in-flight call triggered it.
    CredentialRejected,

    /// The user explicitly logged out.
    LoggedOut,
}
