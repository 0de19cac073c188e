//! Unified error type for the Caregate subsystem.

use caregate_client::ClientError;
use caregate_protocol::ProtocolError;
use caregate_session::SessionError;
use caregate_store::StoreError;

/// Top-level error that wraps all layer-specific errors.
///
/// When using the `caregate` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attributes auto-generate `From` impls, so `?` converts layer errors
/// automatically.
#[derive(Debug, thiserror::Error)]
pub enum CaregateError {
    /// A data-boundary error (unknown role, undecodable payload).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A credential-storage error (I/O, corrupt document).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A pipeline or auth-operation error (rejection, transport, API).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// A session-lifecycle error (double bootstrap, unresolved state).
    #[error(transparent)]
    Session(#[from] SessionError),
}
