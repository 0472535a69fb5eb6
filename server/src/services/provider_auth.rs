//! Provider sign-in: find, link or create the account for a federated identity.
//!
//! ERROR HANDLING
//! ==============
//! Missing identifying keys are an unsuccessful response, not an error.
//! Only storage failures surface as `AccountError`; the route layer turns
//! them into a 500 body.

use profiles::{ProviderSignInRequest, RemoteUser, SignInResponse, UserType, normalize_email};
use rand::Rng;
use sha2::{Digest, Sha256};

use super::accounts::{AccountError, AccountStore, NewAccount};

pub const DEFAULT_USER_TYPE: &str = "alumno";
pub const DEFAULT_PHONE: &str = "000000000";
pub const DEFAULT_COUNTRY_CODE: &str = "NA";

const MISSING_KEYS: &str = "Missing email or provider id.";
const SIGNED_IN: &str = "User signed in and linked.";
const REGISTERED: &str = "User registered and verified with the identity provider.";

/// Sign in (or register) the identity described by `request`.
///
/// # Errors
///
/// Returns an error if the account store fails.
pub async fn sign_in(store: &dyn AccountStore, request: &ProviderSignInRequest) -> Result<SignInResponse, AccountError> {
    let email = request.email.as_deref().and_then(normalize_email);
    let provider_id = request
        .provider_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let (Some(email), Some(provider_id)) = (email, provider_id) else {
        return Ok(SignInResponse { success: false, message: MISSING_KEYS.into(), usuario: None });
    };

    if let Some(existing) = store.find_by_provider_or_email(provider_id, &email).await? {
        if existing.needs_provider_link() {
            store.link_provider(existing.id, provider_id).await?;
            tracing::info!(user_id = existing.id, "provider linked to existing account");
        }
        if !UserType::parse(&existing.tipo_usuario).is_recognized() {
            tracing::warn!(user_id = existing.id, tipo_usuario = %existing.tipo_usuario, "account has an unsupported user type");
        }
        return Ok(SignInResponse {
            success: true,
            message: SIGNED_IN.into(),
            usuario: Some(RemoteUser {
                id: existing.id.to_string(),
                email: Some(existing.email.clone()),
                full_name: existing.display_name().map(str::to_owned),
                tipo_usuario: Some(existing.tipo_usuario.clone()),
                token: None,
            }),
        });
    }

    let name = request
        .full_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| name_from_email(&email), str::to_owned);
    let account = NewAccount {
        nombre_usuario: name.clone(),
        email: email.clone(),
        password_hash: unusable_password_hash(),
        tipo_usuario: DEFAULT_USER_TYPE.into(),
        google_id: provider_id.to_owned(),
        telefono: DEFAULT_PHONE.into(),
        codigo_pais: DEFAULT_COUNTRY_CODE.into(),
    };
    let id = store.create(&account).await?;
    tracing::info!(user_id = id, "account created from provider sign-in");

    Ok(SignInResponse {
        success: true,
        message: REGISTERED.into(),
        usuario: Some(RemoteUser {
            id: id.to_string(),
            email: Some(email),
            full_name: Some(name),
            tipo_usuario: Some(DEFAULT_USER_TYPE.into()),
            token: None,
        }),
    })
}

pub(crate) fn name_from_email(email: &str) -> String {
    let local = email
        .split('@')
        .next()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("user");
    local.to_owned()
}

/// Hash of random bytes: the account has a password column but no usable
/// password until one is set through a reset.
pub(crate) fn unusable_password_hash() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[path = "provider_auth_test.rs"]
mod tests;
