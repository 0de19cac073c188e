//! The file-backed credential store.
//!
//! One JSON document on disk holds the whole [`Credential`]. Persisting
//! token and user as a single document (rather than two files or two keys)
//! is what makes the "set or cleared together" invariant structural: there
//! is no sequence of crashes or interleavings that leaves one half behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use caregate_protocol::Credential;

use crate::{CredentialStore, StoreError};

/// A credential store backed by a JSON file.
///
/// Durable across process restarts: a `FileStore` opened on the same path
/// after a reload sees whatever the previous run saved.
///
/// # Write atomicity
///
/// `save` writes to a sibling temp file and then renames it over the real
/// path. On POSIX, `rename` within a directory is atomic, so a concurrent
/// reader (or a crash mid-save) observes either the old document or the
/// new one — never a partial write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store persisting to `path`. The file need not exist yet;
    /// parent directories are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "credential".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CredentialStore for FileStore {
    fn save(&self, credential: &Credential) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let bytes = serde_json::to_vec_pretty(credential)?;

        // Temp-then-rename: the real path only ever points at a complete
        // document.
        let tmp = self.temp_path();
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            user = %credential.user.email,
            "credential saved"
        );
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "credential cleared");
                Ok(())
            }
            // Already absent — clear is idempotent.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn read(&self) -> Result<Option<Credential>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };

        // An undecodable document is surfaced as Corrupt, not mapped to
        // "absent" — see `StoreError::Corrupt` for the reasoning.
        let credential = serde_json::from_slice(&bytes)?;
        Ok(Some(credential))
    }
}

// =========================================================================
// Tests
// =========================================================================
