//! Error types for the protocol layer.
//!
//! Each crate in Caregate defines its own error enum. This keeps errors
//! specific and meaningful — when you see a `ProtocolError`, you know the
//! problem is in the data itself, not in networking or storage.

/// Errors that can occur at the data boundary.
///
/// `#[derive(thiserror::Error)]` auto-generates the `std::error::Error`
/// implementation; the `#[error("...")]` attributes define the message
/// shown in logs and error chains.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The remote authority (or a persisted record) carried a role value
    /// outside the closed enumeration `{admin, doctor, patient}`.
    ///
    /// This is deliberately loud. A role string we don't recognize means
    /// the client and server disagree about the role model — routing such
    /// a user to a guessed home screen would hide an integration defect,
    /// so the value is surfaced verbatim for diagnosis instead.
    #[error("unknown role {0:?}: expected one of admin, doctor, patient")]
    UnknownRole(String),

    /// Deserialization failed (turning JSON into one of our types).
    ///
    /// Common causes: a malformed response body, missing required fields,
    /// or a persisted credential written by an incompatible version.
    #[error("decode failed: {0}")]
    Decode(#[from] serde_json::Error),
}
