//! The storage trait and the in-memory implementation.

use std::sync::Mutex;

use caregate_protocol::Credential;

use crate::StoreError;

/// Durable key/value persistence for the current session credential.
///
/// # Why a trait?
///
/// The rest of the system doesn't care *where* the credential lives —
/// a file on disk in production, a plain struct in tests. The trait is
/// the seam that lets the request pipeline and session controller be
/// exercised against [`MemoryStore`] without touching the filesystem.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store is shared across async tasks (the request
///   pipeline reads it on every call; the 401 listener clears it).
/// - `'static` → it doesn't borrow temporary data; it lives as long as
///   the portal client.
///
/// # Contract
///
/// - `save` and `clear` are atomic with respect to each other: a `read`
///   never observes a token without its user or a half-cleared state.
/// - All three operations are synchronous — storage is local, never
///   networked, so there is nothing to await.
pub trait CredentialStore: Send + Sync + 'static {
    /// Persists the credential, replacing any previous one.
    fn save(&self, credential: &Credential) -> Result<(), StoreError>;

    /// Removes the persisted credential. Idempotent: clearing an empty
    /// store is a no-op, not an error.
    fn clear(&self) -> Result<(), StoreError>;

    /// Returns the persisted credential, or `None` if nobody is logged in.
    fn read(&self) -> Result<Option<Credential>, StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// An in-process credential store. Nothing survives a restart.
///
/// Used by tests and demos; production deployments use
/// [`FileStore`](crate::FileStore). Holding the whole credential behind
/// one `Mutex<Option<_>>` makes the save/clear atomicity trivial — there
/// is only ever one slot to observe.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Credential>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `credential` — shorthand for
    /// test setups that start from a logged-in state.
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Mutex::new(Some(credential)),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Credential>> {
        // A poisoned mutex means a writer panicked mid-operation. The slot
        // holds a plain Option that is always internally consistent, so
        // recovering the inner value is sound.
        match self.slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl CredentialStore for MemoryStore {
    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        *self.slot() = Some(credential.clone());
        tracing::debug!(user = %credential.user.email, "credential saved (memory)");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot() = None;
        tracing::debug!("credential cleared (memory)");
        Ok(())
    }

    fn read(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.slot().clone())
    }
}

// =========================================================================
// Tests
// =========================================================================
