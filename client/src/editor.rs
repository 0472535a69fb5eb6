//! Profile editors: diff live edits against a baseline, submit only changes.
//!
//! DESIGN
//! ======
//! An editor owns two copies of the profile. `live` takes edits; `baseline`
//! is what the server and the session store are known to hold. A save sends
//! `{id, ...changed}` (plus the canonical username alias for a display-name
//! change) and, only on success, folds the submitted fields into both copies
//! and the store. A failed save changes nothing but the returned error.

use std::collections::BTreeMap;
use std::fmt;

use profiles::{ProfileField, ProfileUpdate, UserProfile, UserType, ValidationErrors, validate_changes};

use crate::api::{ApiError, ProfileService};
use crate::context::SessionContext;
use crate::notice::GENERIC_CONNECT_ERROR;
use crate::reconcile::ProfileView;
use crate::store::StoreError;

const UPDATE_REJECTED: &str = "The profile could not be updated.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Alumno,
    Empresa,
}

impl EditorKind {
    #[must_use]
    pub fn user_type(self) -> UserType {
        match self {
            Self::Alumno => UserType::Alumno,
            Self::Empresa => UserType::Empresa,
        }
    }

    /// Fields this editor exposes, in display order.
    pub fn editable_fields(self) -> impl Iterator<Item = ProfileField> {
        let user_type = self.user_type();
        ProfileField::PROFILE
            .into_iter()
            .filter(move |field| field.editable_by(&user_type))
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_type().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("{field} is not editable on the {kind} profile")]
    NotEditable { field: ProfileField, kind: EditorKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing differed from the baseline; no call was made.
    NothingToUpdate,
    Saved { update: ProfileUpdate, message: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("invalid fields: {0}")]
    Invalid(ValidationErrors),
    #[error("update rejected: {0}")]
    Rejected(String),
    #[error(transparent)]
    Transport(ApiError),
    /// The service accepted the update but the local session write failed.
    /// The edits stay pending against the old baseline.
    #[error("profile saved but the session store write failed: {0}")]
    Store(StoreError),
}

impl SaveError {
    /// Text to show the user next to the form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(errors) => errors.to_string(),
            Self::Rejected(message) => message.clone(),
            Self::Transport(_) => GENERIC_CONNECT_ERROR.to_owned(),
            Self::Store(_) => "Your profile was saved, but this device could not be updated. Save again or sign in to refresh it."
                .to_owned(),
        }
    }
}

// =============================================================================
// EDITOR
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEditor {
    kind: EditorKind,
    live: UserProfile,
    baseline: UserProfile,
}

impl ProfileEditor {
    #[must_use]
    pub fn new(kind: EditorKind, profile: UserProfile) -> Self {
        Self { kind, live: profile.clone(), baseline: profile }
    }

    /// Editor for a rendered view. `None` for an unsupported account type.
    #[must_use]
    pub fn for_view(view: &ProfileView) -> Option<Self> {
        match view {
            ProfileView::Alumno(profile) => Some(Self::new(EditorKind::Alumno, profile.clone())),
            ProfileView::Empresa(profile) => Some(Self::new(EditorKind::Empresa, profile.clone())),
            ProfileView::Unsupported(_) => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    #[must_use]
    pub fn live(&self) -> &UserProfile {
        &self.live
    }

    #[must_use]
    pub fn baseline(&self) -> &UserProfile {
        &self.baseline
    }

    /// Edit one field of the live profile.
    ///
    /// # Errors
    ///
    /// Returns an error if this editor does not expose `field`.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) -> Result<(), EditError> {
        if !field.editable_by(&self.kind.user_type()) {
            return Err(EditError::NotEditable { field, kind: self.kind });
        }
        self.live.set(field, value);
        Ok(())
    }

    /// Editable fields whose live value differs from the baseline.
    #[must_use]
    pub fn changes(&self) -> BTreeMap<ProfileField, String> {
        self.kind
            .editable_fields()
            .filter_map(|field| {
                let live = self.live.value(field)?;
                (Some(live) != self.baseline.value(field)).then(|| (field, live.to_owned()))
            })
            .collect()
    }

    /// Discard live edits.
    pub fn reset(&mut self) {
        self.live = self.baseline.clone();
    }

    /// Submit the change-set.
    ///
    /// # Errors
    ///
    /// Every error leaves the baseline and the store untouched. `Store` means
    /// the remote save succeeded but the session store could not be written;
    /// the edits stay pending so the save can be repeated.
    pub async fn save(&mut self, ctx: &SessionContext, service: &dyn ProfileService) -> Result<SaveOutcome, SaveError> {
        let changes = self.changes();
        if changes.is_empty() {
            return Ok(SaveOutcome::NothingToUpdate);
        }

        let user_type = self.kind.user_type();
        validate_changes(&user_type, changes.iter().map(|(field, value)| (*field, value.as_str())))
            .map_err(SaveError::Invalid)?;

        let update = ProfileUpdate::from_changes(self.baseline.id.clone(), &user_type, changes);
        let response = service.update_profile(&update).await.map_err(|e| {
            tracing::warn!(user_id = %update.id, error = %e, "profile update call failed");
            SaveError::Transport(e)
        })?;
        if !response.success {
            tracing::warn!(user_id = %update.id, message = %response.message, "profile update rejected");
            let message = if response.message.is_empty() { UPDATE_REJECTED.to_owned() } else { response.message };
            return Err(SaveError::Rejected(message));
        }

        let entries: Vec<(ProfileField, String)> = update
            .fields
            .iter()
            .map(|(field, value)| (*field, value.clone()))
            .collect();
        ctx.set_many(&entries).map_err(|e| {
            tracing::warn!(user_id = %update.id, error = %e, "saved profile not written to session store");
            SaveError::Store(e)
        })?;
        for (field, value) in entries {
            self.baseline.set(field, value.clone());
            self.live.set(field, value);
        }

        tracing::info!(user_id = %update.id, fields = update.fields.len(), "profile updated");
        Ok(SaveOutcome::Saved { update, message: response.message })
    }
}

#[cfg(test)]
#[path = "editor_test.rs"]
mod tests;
