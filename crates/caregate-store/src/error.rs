//! Error types for the storage layer.

/// Errors that can occur while persisting or reading the credential.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying filesystem operation failed (permissions, disk
    /// full, missing parent directory, ...).
    #[error("credential store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted document exists but doesn't decode into a
    /// [`Credential`](caregate_protocol::Credential).
    ///
    /// This includes a persisted `user_type` outside the closed role
    /// enumeration. Corruption is surfaced, not treated as "absent":
    /// silently discarding an undecodable credential would hide the
    /// defect that produced it.
    #[error("credential store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
