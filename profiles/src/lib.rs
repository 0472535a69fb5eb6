//! Shared profile model and JSON contracts for the profile service.
//!
//! This crate owns the representation used by both `server` and `client`:
//! the `UserProfile` record, the typed field/key table that replaces raw
//! string keys, the display-name alias table, local field validation, and the
//! request/response bodies exchanged with the profile service.

pub mod field;
pub mod profile;
pub mod validate;
pub mod wire;

pub use field::{NameAlias, ProfileField, SESSION_KEY_PREFIX};
pub use profile::{UserProfile, UserType};
pub use validate::{FieldError, ValidationErrors, normalize_email, validate_changes, validate_field};
pub use wire::{ApiResponse, LogEntryRequest, ProfileUpdate, ProviderSignInRequest, RemoteUser, SignInResponse};
