//! Error types for the session layer.

use caregate_client::ClientError;
use caregate_store::StoreError;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// `bootstrap()` was called a second time. The bootstrap runs exactly
    /// once per process; after it resolves, state changes only through
    /// login, logout, or forced invalidation.
    #[error("session already bootstrapped")]
    AlreadyBootstrapped,

    /// A state-changing operation was attempted while the session was
    /// still `Unknown`. Nothing may act on the session before the
    /// bootstrapper has reconciled stored credentials with the authority.
    #[error("session not bootstrapped yet")]
    NotBootstrapped,

    /// The underlying client operation failed.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Reading or clearing the credential store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
