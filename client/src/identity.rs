//! Identity-provider seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! Sign-in happens out of band: the user is redirected to a federated
//! provider and comes back with a one-time result. The reconciler consumes
//! that result at most once per mount through `IdentityProvider`.
//!
//! TRADE-OFFS
//! ==========
//! Provider failures are never retried here; the caller shows a notice and
//! returns the user to the login screen.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Identity returned by the provider after a completed redirect.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderIdentity {
    pub provider_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("sign-in was cancelled")]
    Cancelled,
    #[error("identity provider unreachable: {0}")]
    Network(String),
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// Source of the pending redirect result.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Take the redirect result, if one is pending. A second call returns
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider reported a failed or cancelled flow.
    async fn take_redirect_result(&self) -> Result<Option<ProviderIdentity>, IdentityError>;
}

// =============================================================================
// IN-MEMORY SLOT
// =============================================================================

/// One-shot slot filled by the embedder when the redirect lands.
#[derive(Debug, Default)]
pub struct PendingRedirect {
    slot: Mutex<Option<Result<ProviderIdentity, IdentityError>>>,
}

impl PendingRedirect {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn completed(identity: ProviderIdentity) -> Self {
        Self { slot: Mutex::new(Some(Ok(identity))) }
    }

    #[must_use]
    pub fn failed(error: IdentityError) -> Self {
        Self { slot: Mutex::new(Some(Err(error))) }
    }

    /// Replace whatever is pending.
    pub fn put(&self, result: Result<ProviderIdentity, IdentityError>) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(result);
        }
    }
}

#[async_trait]
impl IdentityProvider for PendingRedirect {
    async fn take_redirect_result(&self) -> Result<Option<ProviderIdentity>, IdentityError> {
        let taken = self
            .slot
            .lock()
            .map_err(|_| IdentityError::Provider("redirect slot poisoned".into()))?
            .take();
        taken.transpose()
    }
}

// =============================================================================
// FILE SLOT
// =============================================================================

/// Redirect result handed over as a JSON file, removed once read.
#[derive(Debug, Clone)]
pub struct FileRedirect {
    path: PathBuf,
}

impl FileRedirect {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Write `identity` as the pending result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn put(&self, identity: &ProviderIdentity) -> Result<(), IdentityError> {
        let raw = serde_json::to_vec(identity).map_err(|e| IdentityError::Provider(e.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| IdentityError::Provider(e.to_string()))
    }
}

#[async_trait]
impl IdentityProvider for FileRedirect {
    async fn take_redirect_result(&self) -> Result<Option<ProviderIdentity>, IdentityError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IdentityError::Provider(e.to_string())),
        };
        // Consume before parsing so a corrupt file is not retried forever.
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to remove redirect file");
        }
        serde_json::from_slice(&raw)
            .map(Some)
            .map_err(|e| IdentityError::Provider(format!("malformed redirect result: {e}")))
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
