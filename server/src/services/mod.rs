//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on protocol translation.

pub mod accounts;
pub mod frontend_log;
pub mod profile;
pub mod provider_auth;
