//! Session reconciliation on protected-screen mount.
//!
//! SYSTEM CONTEXT
//! ==============
//! Three sources can say who is signed in: a pending identity-provider
//! redirect, the profile service (which turns that redirect into an account),
//! and the session store. `Reconciler::run` checks them in that order, once,
//! and yields exactly one outcome: a profile view or a trip to login.
//!
//! DESIGN
//! ======
//! - A redirect result wins over whatever the store holds. A successful
//!   sign-in replaces the whole `user*` namespace in one batch; a failed one
//!   clears it, so a stale session never survives a failed sign-in.
//! - Suspension points are the provider and service calls. After each one
//!   the `MountGuard` is checked and, if the screen is gone, the result is
//!   dropped without touching the store.
//! - Store re-reads (`evaluate_store`) are synchronous, so cross-tab events can
//!   re-evaluate without another network round trip.
//!
//! TRADE-OFFS
//! ==========
//! Nothing is retried. An identity-provider error leaves the store alone:
//! the user may still hold a valid earlier session, but is sent to login to
//! restart the flow they just attempted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use profiles::{ProviderSignInRequest, SignInResponse, UserProfile, UserType};

use crate::api::ProfileService;
use crate::context::SessionContext;
use crate::identity::{IdentityError, IdentityProvider, ProviderIdentity};
use crate::notice::{ACCESS_DENIED, GENERIC_CONNECT_ERROR, Notice};

pub const SUPPORT_MESSAGE: &str = "Your account type is not supported yet. Please contact support.";
const MISSING_EMAIL: &str = "The identity provider did not share an email address.";

// =============================================================================
// MOUNT GUARD
// =============================================================================

/// Shared "still mounted" flag. Clones observe the same flag.
#[derive(Debug, Clone)]
pub struct MountGuard(Arc<AtomicBool>);

impl MountGuard {
    #[must_use]
    pub fn mounted() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::mounted()
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// What a protected screen renders for a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileView {
    Alumno(UserProfile),
    Empresa(UserProfile),
    /// Unknown account type: display-only, shows `SUPPORT_MESSAGE`.
    Unsupported(UserProfile),
}

impl ProfileView {
    #[must_use]
    pub fn for_profile(profile: UserProfile) -> Self {
        match profile.user_type {
            UserType::Alumno => Self::Alumno(profile),
            UserType::Empresa => Self::Empresa(profile),
            UserType::Unrecognized(_) => Self::Unsupported(profile),
        }
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        match self {
            Self::Alumno(profile) | Self::Empresa(profile) | Self::Unsupported(profile) => profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Profile { view: ProfileView, notice: Option<Notice> },
    Login { notice: Option<Notice> },
    /// The screen unmounted while a call was outstanding.
    Discarded,
}

// =============================================================================
// RECONCILER
// =============================================================================

#[derive(Clone)]
pub struct Reconciler {
    ctx: SessionContext,
    identity: Arc<dyn IdentityProvider>,
    service: Arc<dyn ProfileService>,
}

impl Reconciler {
    #[must_use]
    pub fn new(ctx: SessionContext, identity: Arc<dyn IdentityProvider>, service: Arc<dyn ProfileService>) -> Self {
        Self { ctx, identity, service }
    }

    #[must_use]
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Redirect result first, then the stored session, then login.
    pub async fn run(&self, guard: &MountGuard) -> Outcome {
        if !guard.is_mounted() {
            return Outcome::Discarded;
        }

        let redirect = self.identity.take_redirect_result().await;
        if !guard.is_mounted() {
            tracing::debug!("unmounted during redirect check; discarding");
            return Outcome::Discarded;
        }

        match redirect {
            Ok(Some(identity)) => self.sign_in(identity, guard).await,
            Ok(None) => self.evaluate_store(),
            Err(e) => {
                tracing::warn!(error = %e, "identity provider failed");
                Outcome::Login { notice: Some(identity_notice(&e)) }
            }
        }
    }

    /// Evaluate the stored session alone.
    #[must_use]
    pub fn evaluate_store(&self) -> Outcome {
        match self.ctx.load_profile() {
            Ok(Some(profile)) => Outcome::Profile { view: ProfileView::for_profile(profile), notice: None },
            Ok(None) => Outcome::Login { notice: Some(Notice::error("Access denied", ACCESS_DENIED)) },
            Err(e) => {
                tracing::warn!(error = %e, "session store unreadable");
                Outcome::Login { notice: Some(Notice::error("Access denied", ACCESS_DENIED)) }
            }
        }
    }

    async fn sign_in(&self, identity: ProviderIdentity, guard: &MountGuard) -> Outcome {
        let request = ProviderSignInRequest {
            email: identity.email.filter(|email| !email.trim().is_empty()),
            full_name: identity.display_name,
            provider_id: Some(identity.provider_id),
        };
        if request.email.is_none() {
            return self.sign_in_failed(MISSING_EMAIL);
        }

        let response = self.service.provider_sign_in(&request).await;
        if !guard.is_mounted() {
            tracing::debug!("unmounted during sign-in; discarding");
            return Outcome::Discarded;
        }

        match response {
            Ok(SignInResponse { success: true, message, usuario: Some(user) }) => {
                let (profile, token) = user.into_profile();
                if let Err(e) = self.ctx.store_profile(&profile, token.as_deref()) {
                    tracing::warn!(error = %e, "failed to persist signed-in session");
                    return self.sign_in_failed("Your session could not be saved on this device.");
                }
                tracing::info!(user_id = %profile.id, user_type = %profile.user_type, "signed in via provider");
                let description = if message.is_empty() { "Welcome back.".to_owned() } else { message };
                Outcome::Profile {
                    view: ProfileView::for_profile(profile),
                    notice: Some(Notice::info("Signed in", description)),
                }
            }
            Ok(SignInResponse { message, .. }) => {
                tracing::warn!(%message, "provider sign-in rejected");
                if message.is_empty() {
                    self.sign_in_failed("The server did not return an account.")
                } else {
                    self.sign_in_failed(&message)
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "provider sign-in call failed");
                self.sign_in_failed(GENERIC_CONNECT_ERROR)
            }
        }
    }

    fn sign_in_failed(&self, description: &str) -> Outcome {
        if let Err(e) = self.ctx.clear_all() {
            tracing::warn!(error = %e, "failed to clear session after sign-in failure");
        }
        Outcome::Login { notice: Some(Notice::error("Sign-in failed", description)) }
    }
}

fn identity_notice(error: &IdentityError) -> Notice {
    match error {
        IdentityError::Cancelled => Notice::error("Sign-in cancelled", "The sign-in window was closed."),
        IdentityError::Network(_) => Notice::error("Sign-in failed", GENERIC_CONNECT_ERROR),
        IdentityError::Provider(detail) => Notice::error("Sign-in failed", detail.clone()),
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
