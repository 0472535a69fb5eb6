//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the account store and the optional front-end log file.

use std::path::PathBuf;
use std::sync::Arc;

use crate::services::accounts::AccountStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    /// Append target for `POST /api/log`. `None` records through tracing only.
    pub frontend_log: Option<PathBuf>,
}

impl AppState {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, frontend_log: Option<PathBuf>) -> Self {
        Self { accounts, frontend_log }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::services::accounts::{AccountError, AccountRow, NewAccount, ProfileColumn};

    /// In-memory `registro_usuarios`.
    #[derive(Default)]
    pub struct MemoryAccounts {
        pub rows: Mutex<Vec<AccountRow>>,
        pub updates: Mutex<Vec<(u64, Vec<(ProfileColumn, String)>)>>,
        pub created: Mutex<Vec<NewAccount>>,
        /// Every call fails with a database error when set.
        pub fail: bool,
    }

    impl MemoryAccounts {
        #[must_use]
        pub fn with_rows(rows: Vec<AccountRow>) -> Self {
            Self { rows: Mutex::new(rows), ..Self::default() }
        }

        #[must_use]
        pub fn failing() -> Self {
            Self { fail: true, ..Self::default() }
        }

        fn check(&self) -> Result<(), AccountError> {
            if self.fail { Err(AccountError::Db(sqlx::Error::PoolTimedOut)) } else { Ok(()) }
        }
    }

    #[async_trait]
    impl AccountStore for MemoryAccounts {
        async fn find_by_provider_or_email(
            &self,
            provider_id: &str,
            email: &str,
        ) -> Result<Option<AccountRow>, AccountError> {
            self.check()?;
            let rows = self.rows.lock().unwrap();
            let by_provider = rows
                .iter()
                .find(|r| r.google_id.as_deref() == Some(provider_id));
            Ok(by_provider
                .or_else(|| rows.iter().find(|r| r.email == email))
                .cloned())
        }

        async fn link_provider(&self, id: u64, provider_id: &str) -> Result<(), AccountError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
                row.google_id = Some(provider_id.to_owned());
                row.verificado = true;
            }
            Ok(())
        }

        async fn create(&self, account: &NewAccount) -> Result<u64, AccountError> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let id = rows.iter().map(|r| r.id).max().unwrap_or(0) + 1;
            rows.push(AccountRow {
                id,
                email: account.email.clone(),
                nombre_usuario: Some(account.nombre_usuario.clone()),
                nombre_empresa: None,
                tipo_usuario: account.tipo_usuario.clone(),
                google_id: Some(account.google_id.clone()),
                verificado: true,
            });
            self.created.lock().unwrap().push(account.clone());
            Ok(id)
        }

        async fn update_columns(&self, id: u64, columns: &[(ProfileColumn, String)]) -> Result<u64, AccountError> {
            self.check()?;
            self.updates.lock().unwrap().push((id, columns.to_vec()));
            let known = self.rows.lock().unwrap().iter().any(|r| r.id == id);
            Ok(u64::from(known))
        }
    }

    #[must_use]
    pub fn alumno_row() -> AccountRow {
        AccountRow {
            id: 42,
            email: "a@b.com".into(),
            nombre_usuario: Some("Ana".into()),
            nombre_empresa: None,
            tipo_usuario: "alumno".into(),
            google_id: Some("uid-1".into()),
            verificado: true,
        }
    }

    #[must_use]
    pub fn empresa_row() -> AccountRow {
        AccountRow {
            id: 7,
            email: "hr@acme.test".into(),
            nombre_usuario: None,
            nombre_empresa: Some("Acme".into()),
            tipo_usuario: "empresa".into(),
            google_id: None,
            verificado: false,
        }
    }

    /// `AppState` over the given accounts, without a log file.
    #[must_use]
    pub fn test_app_state(accounts: Arc<MemoryAccounts>) -> AppState {
        AppState::new(accounts, None)
    }
}
