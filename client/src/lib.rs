//! Client-side session handling for the profile pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! A protected screen mounts, reconciles who is signed in (identity-provider
//! redirect, then the session store, then login), renders the persona's
//! editor and submits partial updates to the profile service. The session
//! store is shared by every tab; changes fan out over the channel owned by
//! `SessionContext`.
//!
//! Embedders wire a `SessionStore`, an `IdentityProvider` and a
//! `ProfileService` into a `Reconciler` and mount a `ProfileScreen`.

pub mod api;
pub mod context;
pub mod editor;
pub mod identity;
pub mod notice;
pub mod reconcile;
pub mod screen;
pub mod store;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use api::{ApiConfig, ApiError, HttpProfileService, ProfileService};
pub use context::{SessionContext, SessionEvent};
pub use editor::{EditError, EditorKind, ProfileEditor, SaveError, SaveOutcome};
pub use identity::{FileRedirect, IdentityError, IdentityProvider, PendingRedirect, ProviderIdentity};
pub use notice::{Notice, NoticeLevel};
pub use reconcile::{MountGuard, Outcome, ProfileView, Reconciler, SUPPORT_MESSAGE};
pub use screen::{ProfileScreen, ScreenState};
pub use store::{FileStore, MemoryStore, SessionStore, StoreBatch, StoreError};
