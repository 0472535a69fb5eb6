//! Typed session context shared by every screen.
//!
//! DESIGN
//! ======
//! `SessionContext` is injected into screens and editors instead of touching
//! raw storage. It pairs the store with a broadcast channel: every mutating
//! accessor writes first, then publishes a `session-changed` event so other
//! subscribers (other tabs) can re-read. Delivery is best-effort; a
//! subscriber that lags simply re-reads the store.

use std::sync::Arc;

use profiles::{ProfileField, SESSION_KEY_PREFIX, UserProfile, UserType};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::store::{SessionStore, StoreBatch, StoreError};

const SESSION_CHANNEL_CAPACITY: usize = 16;

/// Message published on the session channel after every store mutation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The stored session changed. `profile` is `None` after a logout or a
    /// failed sign-in.
    SessionChanged { profile: Option<UserProfile> },
}

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);
        Self { store, events }
    }

    /// Receive every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Read one stored field.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn get(&self, field: ProfileField) -> Result<Option<String>, StoreError> {
        self.store.get(field.session_key())
    }

    /// Write several fields in one batch, then publish the resulting profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; nothing is published.
    pub fn set_many(&self, entries: &[(ProfileField, String)]) -> Result<(), StoreError> {
        let batch = entries
            .iter()
            .fold(StoreBatch::new(), |batch, (field, value)| batch.set(field.session_key(), value.clone()));
        self.store.apply(&batch)?;

        let profile = self.load_profile().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "session re-read after write failed");
            None
        });
        self.publish(profile);
        Ok(())
    }

    /// Remove every key in the session namespace and publish a logout.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; nothing is published.
    pub fn clear_all(&self) -> Result<(), StoreError> {
        self.store
            .apply(&StoreBatch::new().clear_prefix(SESSION_KEY_PREFIX))?;
        tracing::debug!("session cleared");
        self.publish(None);
        Ok(())
    }

    /// Replace the whole session namespace with `profile` (and `token`).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written; the previous session
    /// is left intact and nothing is published.
    pub fn store_profile(&self, profile: &UserProfile, token: Option<&str>) -> Result<(), StoreError> {
        let mut batch = profile
            .entries()
            .fold(StoreBatch::new().clear_prefix(SESSION_KEY_PREFIX), |batch, (field, value)| {
                batch.set(field.session_key(), value)
            });
        if let Some(token) = token {
            batch = batch.set(ProfileField::Token.session_key(), token);
        }
        self.store.apply(&batch)?;
        tracing::debug!(user_id = %profile.id, user_type = %profile.user_type, "session stored");
        self.publish(Some(profile.clone()));
        Ok(())
    }

    /// Reconstruct the profile from one snapshot of the store.
    ///
    /// `None` when no (or an empty) `userId` is stored. Missing fields read
    /// as empty strings; a missing `userType` reads as alumno; an empresa
    /// with no stored company name falls back to its full name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load_profile(&self) -> Result<Option<UserProfile>, StoreError> {
        let mut entries = self.store.snapshot()?;
        let mut take = |field: ProfileField| entries.remove(field.session_key());
        let Some(id) = take(ProfileField::Id).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let mut profile = UserProfile::new(id);
        for field in ProfileField::PROFILE {
            match (field, take(field)) {
                (ProfileField::Id, _) => {}
                (ProfileField::UserType, None) => profile.user_type = UserType::Alumno,
                (_, value) => {
                    profile.set(field, value.unwrap_or_default());
                }
            }
        }
        profile.backfill_display_name();
        Ok(Some(profile))
    }

    fn publish(&self, profile: Option<UserProfile>) {
        // No subscribers is not an error: nobody else is looking.
        let _ = self.events.send(SessionEvent::SessionChanged { profile });
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
