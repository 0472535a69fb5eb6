//! Request/response bodies exchanged with the profile service.
//!
//! DESIGN
//! ======
//! Both endpoints ignore unknown members, so every response type here
//! deserializes leniently: optional members default, and ids are accepted
//! as either JSON strings or integers. Update bodies are flat
//! (`{"id": …, "<field>": …}`), so `ProfileUpdate` serializes itself by hand
//! from its typed field map.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::field::{ProfileField, canonical_alias};
use crate::profile::{UserProfile, UserType};

// =============================================================================
// PROVIDER SIGN-IN
// =============================================================================

/// Body of the provider sign-in call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSignInRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Stable identity-provider user id. `googleId` is accepted for older clients.
    #[serde(default, alias = "googleId")]
    pub provider_id: Option<String>,
}

/// Response of the provider sign-in call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usuario: Option<RemoteUser>,
}

/// Account row as returned by the profile service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "fullName")]
    pub full_name: Option<String>,
    #[serde(default)]
    pub tipo_usuario: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl RemoteUser {
    /// Build the session profile from the returned row, plus its token if any.
    ///
    /// Fields the row does not carry start empty; an unknown `tipo_usuario`
    /// is preserved so the caller can render the support notice.
    #[must_use]
    pub fn into_profile(self) -> (UserProfile, Option<String>) {
        let mut profile = UserProfile::new(self.id);
        profile.email = self.email.unwrap_or_default();
        profile.full_name = self.full_name.unwrap_or_default();
        profile.user_type = UserType::parse(self.tipo_usuario.as_deref().unwrap_or_default());
        profile.backfill_display_name();
        (profile, self.token)
    }
}

// =============================================================================
// PROFILE UPDATE
// =============================================================================

/// Partial update: the account id plus only the fields being changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub id: String,
    pub fields: BTreeMap<ProfileField, String>,
}

impl ProfileUpdate {
    /// Build an update from a change-set, adding the canonical username alias
    /// for a display-name change (empresa `companyName` is also sent as
    /// `fullName`) unless the change-set already carries that field.
    #[must_use]
    pub fn from_changes(id: impl Into<String>, user_type: &UserType, changes: BTreeMap<ProfileField, String>) -> Self {
        let mut fields = changes;
        let aliased: Vec<(ProfileField, String)> = fields
            .iter()
            .filter_map(|(field, value)| canonical_alias(user_type, *field).map(|canonical| (canonical, value.clone())))
            .collect();
        for (canonical, value) in aliased {
            fields.entry(canonical).or_insert(value);
        }
        Self { id: id.into(), fields }
    }
}

impl Serialize for ProfileUpdate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (field, value) in &self.fields {
            map.serialize_entry(field.wire_name(), value)?;
        }
        map.end()
    }
}

/// Generic `{success, message}` acknowledgement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

impl ApiResponse {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into() }
    }
}

// =============================================================================
// LOG RECEIVER
// =============================================================================

/// Body of the front-end log call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntryRequest {
    #[serde(default, rename = "logEntry")]
    pub log_entry: Option<String>,
}

// =============================================================================
// HELPERS
// =============================================================================

fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(id) if !id.is_empty() => Ok(id),
        serde_json::Value::Number(number) if number.is_u64() || number.is_i64() => Ok(number.to_string()),
        _ => Err(D::Error::custom("expected non-empty string or integer id")),
    }
}

#[cfg(test)]
#[path = "wire_test.rs"]
mod tests;
