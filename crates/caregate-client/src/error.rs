//! Error types for the client layer.

use caregate_store::StoreError;

/// Errors that can occur in the request pipeline.
///
/// The taxonomy matters more than usual here, because each variant drives
/// a different reaction upstream:
///
/// - [`CredentialRejected`](Self::CredentialRejected) is **fatal to the
///   session** — by the time a caller sees it, the store is already
///   cleared and the rejection event broadcast. Never retried.
/// - [`Api`](Self::Api) is a business rejection (bad password, duplicate
///   email, ...) — recoverable, surfaced to the user, session untouched.
/// - [`Transport`](Self::Transport) and [`Decode`](Self::Decode) are
///   infrastructure failures — recoverable, generic message, session
///   untouched, caller may retry manually.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The remote authority rejected our bearer token (401 on an
    /// authenticated request). The session is over; the pipeline has
    /// already cleared the store and broadcast the event.
    #[error("credential rejected by the remote authority")]
    CredentialRejected,

    /// The server answered with a non-success status other than a
    /// credential rejection. `reason` is the server's `{"error"}` message
    /// when it sent one, otherwise the status line.
    #[error("request failed with status {status}: {reason}")]
    Api { status: u16, reason: String },

    /// The request never completed: connection refused, DNS failure,
    /// timeout, broken pipe. The transport's own error surfacing is
    /// trusted here — this subsystem owns no timeout of its own.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response arrived but its body wasn't the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Reading or writing the credential store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
